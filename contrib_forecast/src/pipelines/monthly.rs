//! Total contributions of a calendar month

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::periods::monthly_totals;
use crate::pipelines::{
    clamp_to_history, ForecastContext, ForecastPipeline, PipelineCore, PipelineKind,
};
use chrono::Datelike;
use regression_math::{Predictor, TrainingSeries};
use serde::Serialize;

/// Predicted total for one month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyForecastResult {
    pub total_predicted_contribution: u64,
    /// Month number, 1 to 12
    pub month: u32,
}

/// Forecasts monthly contribution totals from the month number alone
#[derive(Debug)]
pub struct MonthlyTotalForecast<'a> {
    core: PipelineCore<'a>,
    max_observed: f64,
}

impl<'a> MonthlyTotalForecast<'a> {
    /// Create an untrained pipeline
    pub fn new(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Self {
        Self {
            core: PipelineCore::new(calendar, config, context),
            max_observed: 0.0,
        }
    }

    /// Create a pipeline and train it
    pub fn train(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Result<Self> {
        let mut pipeline = Self::new(calendar, config, context);
        pipeline.get_model()?;
        Ok(pipeline)
    }

    /// Largest monthly total seen in training
    pub fn max_observed(&self) -> f64 {
        self.max_observed
    }

    /// Predict the total for month `month` (1 to 12)
    pub fn predict_month(&self, month: u32) -> Result<MonthlyForecastResult> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        let raw = self.core.predict_raw(&[f64::from(month)])?;
        Ok(MonthlyForecastResult {
            total_predicted_contribution: clamp_to_history(
                raw,
                self.max_observed,
                self.core.config.monthly_clamp_factor,
            ),
            month,
        })
    }

    pub(crate) fn context(&self) -> ForecastContext {
        self.core.context
    }
}

impl ForecastPipeline for MonthlyTotalForecast<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::MonthlyTotal
    }

    fn data_prep(&self) -> Result<TrainingSeries> {
        let mut series = TrainingSeries::new();
        for month in monthly_totals(self.core.calendar.days()).completed {
            series.push(vec![f64::from(month.reference_date.month())], month.total as f64);
        }
        Ok(series)
    }

    fn get_model(&mut self) -> Result<()> {
        let series = self.data_prep()?;
        self.max_observed = series.max_target().unwrap_or(0.0);
        self.core.train(self.kind(), series)
    }

    fn predictor(&self) -> &Predictor {
        &self.core.predictor
    }
}
