//! Forecast pipelines built on top of the degree-ladder model selector
//!
//! Every pipeline follows the same lifecycle:
//!
//! 1. `data_prep` turns the calendar into a training series;
//! 2. `get_model` selects a polynomial model, or keeps
//!    [`Predictor::Untrained`] when the series is empty;
//! 3. a `predict_*` method evaluates one query row and post-processes the
//!    raw value into an integer forecast.

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use chrono::{Local, NaiveDate};
use regression_math::{ExpansionCache, ModelSelector, Predictor, TrainingSeries};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// The four forecast variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Days until the next day with contributions
    NextGap,
    /// Total contributions of an ISO week
    WeeklyTotal,
    /// Total contributions of a calendar month
    MonthlyTotal,
    /// Sum of the twelve monthly forecasts
    YearlyTotal,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineKind::NextGap => "next-gap",
            PipelineKind::WeeklyTotal => "weekly-total",
            PipelineKind::MonthlyTotal => "monthly-total",
            PipelineKind::YearlyTotal => "yearly-total",
        };
        f.write_str(name)
    }
}

/// Request-scoped facts the pipelines need besides the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastContext {
    /// The day the forecast is made on
    pub today: NaiveDate,
}

impl ForecastContext {
    /// Create a context anchored at `today`
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The day after `today`
    pub fn tomorrow(&self) -> Result<NaiveDate> {
        self.today.succ_opt().ok_or_else(|| {
            ForecastError::InvalidParameter(format!("{} has no following day", self.today))
        })
    }
}

impl Default for ForecastContext {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Common interface for forecast pipelines
pub trait ForecastPipeline {
    /// Which variant this pipeline is
    fn kind(&self) -> PipelineKind;

    /// Build the training series from the calendar
    fn data_prep(&self) -> Result<TrainingSeries>;

    /// Train the pipeline's predictor
    fn get_model(&mut self) -> Result<()>;

    /// The current predictor
    fn predictor(&self) -> &Predictor;

    /// Whether a model has been selected
    fn is_trained(&self) -> bool {
        self.predictor().is_trained()
    }
}

/// State shared by the single-model pipelines
#[derive(Debug)]
pub(crate) struct PipelineCore<'a> {
    pub(crate) calendar: &'a ContributionCalendar,
    pub(crate) config: ForecastConfig,
    pub(crate) context: ForecastContext,
    pub(crate) predictor: Predictor,
    cache: Arc<ExpansionCache>,
}

impl<'a> PipelineCore<'a> {
    pub(crate) fn new(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Self {
        let cache = ExpansionCache::shared(config.expansion_cache_capacity);
        Self {
            calendar,
            config,
            context,
            predictor: Predictor::Untrained,
            cache,
        }
    }

    /// Select a model for `series`, leaving the predictor untrained when it is empty
    pub(crate) fn train(&mut self, kind: PipelineKind, mut series: TrainingSeries) -> Result<()> {
        if series.is_empty() {
            warn!(pipeline = %kind, "training series is empty, model stays untrained");
            self.predictor = Predictor::Untrained;
            return Ok(());
        }

        let dropped = series.truncate_to_recent(self.config.max_training_samples);
        if dropped > 0 {
            warn!(
                pipeline = %kind,
                dropped,
                kept = series.len(),
                "training series exceeds the sample cap, oldest samples dropped"
            );
        }

        self.predictor = ModelSelector::new(&series)
            .with_max_degree(self.config.max_degree)
            .with_cache(Arc::clone(&self.cache))
            .compute_best_model()?;
        Ok(())
    }

    /// Evaluate the predictor on one query row
    pub(crate) fn predict_raw(&self, row: &[f64]) -> Result<f64> {
        Ok(self.predictor.predict_one(row)?)
    }
}

/// Round half to even, then drop the sign
pub(crate) fn round_abs(value: f64) -> f64 {
    value.round_ties_even().abs()
}

/// Post-process a period total: values above `factor` times the largest
/// observed total are treated as runaway extrapolation and reported as 0.
pub(crate) fn clamp_to_history(raw: f64, max_observed: f64, factor: f64) -> u64 {
    let value = round_abs(raw);
    if !value.is_finite() || value > factor * max_observed {
        0
    } else {
        value as u64
    }
}

/// Either a forecast or an error record, serialized as `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForecastResponse<T> {
    /// Successful forecast
    Forecast(T),
    /// Failed forecast
    Error {
        /// Human-readable reason
        error: String,
    },
}

impl<T> From<Result<T>> for ForecastResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => ForecastResponse::Forecast(value),
            Err(err) => ForecastResponse::Error {
                error: err.to_string(),
            },
        }
    }
}

impl<T> ForecastResponse<T> {
    /// Whether this is an error record
    pub fn is_error(&self) -> bool {
        matches!(self, ForecastResponse::Error { .. })
    }
}

pub mod dispatch;
pub mod monthly;
pub mod next_gap;
pub mod weekly;
pub mod yearly;

pub use dispatch::{run_forecast, ForecastReport, ForecastRequest};
pub use monthly::{MonthlyForecastResult, MonthlyTotalForecast};
pub use next_gap::{NextGapForecast, NextGapForecastResult};
pub use weekly::{WeeklyForecastResult, WeeklyTotalForecast};
pub use yearly::{YearlyForecastResult, YearlyTotalForecast};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_abs_ties_to_even() {
        assert_eq!(round_abs(2.5), 2.0);
        assert_eq!(round_abs(3.5), 4.0);
        assert_eq!(round_abs(-2.6), 3.0);
        assert_eq!(round_abs(-0.4), 0.0);
    }

    #[test]
    fn test_clamp_to_history() {
        assert_eq!(clamp_to_history(19.6, 10.0, 2.0), 20);
        assert_eq!(clamp_to_history(20.6, 10.0, 2.0), 0);
        assert_eq!(clamp_to_history(-7.2, 10.0, 2.0), 7);
        assert_eq!(clamp_to_history(f64::NAN, 10.0, 2.0), 0);
    }

    #[test]
    fn test_error_response_shape() {
        let response: ForecastResponse<u32> = Err(ForecastError::ModelNotTrained).into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"error": "model has not been trained"}));
    }

    #[test]
    fn test_tomorrow() {
        let ctx = ForecastContext::new(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(ctx.tomorrow().unwrap(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
