//! Total contributions of an ISO week

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::periods::{week_of_month, weekly_totals};
use crate::pipelines::{
    clamp_to_history, ForecastContext, ForecastPipeline, PipelineCore, PipelineKind,
};
use chrono::{Datelike, NaiveDate};
use regression_math::{Predictor, TrainingSeries};
use serde::Serialize;

/// Predicted total for the week containing `weekdate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyForecastResult {
    pub total_predicted_contribution: u64,
    pub weekdate: NaiveDate,
}

/// Forecasts weekly contribution totals from (week of month, ISO week, month)
#[derive(Debug)]
pub struct WeeklyTotalForecast<'a> {
    core: PipelineCore<'a>,
    max_observed: f64,
}

impl<'a> WeeklyTotalForecast<'a> {
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

    fn features(date: NaiveDate) -> Vec<f64> {
        vec![
            week_of_month(date) as f64,
            date.iso_week().week() as f64,
            date.month() as f64,
        ]
    }

    /// Largest weekly total seen in training
    pub fn max_observed(&self) -> f64 {
        self.max_observed
    }

    /// Predict the total for the week containing `date`
    pub fn predict_week(&self, date: NaiveDate) -> Result<WeeklyForecastResult> {
        let raw = self.core.predict_raw(&Self::features(date))?;
        Ok(WeeklyForecastResult {
            total_predicted_contribution: clamp_to_history(
                raw,
                self.max_observed,
                self.core.config.weekly_clamp_factor,
            ),
            weekdate: date,
        })
    }

    /// Predict the total for the current week
    pub fn predict_current_week(&self) -> Result<WeeklyForecastResult> {
        self.predict_week(self.core.context.today)
    }
}

impl ForecastPipeline for WeeklyTotalForecast<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::WeeklyTotal
    }

    fn data_prep(&self) -> Result<TrainingSeries> {
        let mut series = TrainingSeries::new();
        for week in weekly_totals(self.core.calendar.days()).completed {
            series.push(Self::features(week.reference_date), week.total as f64);
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
