//! Total contributions of the current year

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::pipelines::monthly::MonthlyTotalForecast;
use crate::pipelines::{ForecastContext, ForecastPipeline, PipelineKind};
use chrono::Datelike;
use regression_math::{Predictor, TrainingSeries};
use serde::Serialize;

/// Predicted total for a whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyForecastResult {
    pub total_predicted_contribution: u64,
    pub year: i32,
}

/// Sums the twelve monthly forecasts; has no model of its own
#[derive(Debug)]
pub struct YearlyTotalForecast<'a> {
    monthly: MonthlyTotalForecast<'a>,
}

impl<'a> YearlyTotalForecast<'a> {
    /// Create an untrained pipeline
    pub fn new(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Self {
        Self {
            monthly: MonthlyTotalForecast::new(calendar, config, context),
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

    /// Wrap an already trained monthly pipeline
    pub fn from_monthly(monthly: MonthlyTotalForecast<'a>) -> Self {
        Self { monthly }
    }

    /// The monthly pipeline this forecast delegates to
    pub fn monthly(&self) -> &MonthlyTotalForecast<'a> {
        &self.monthly
    }

    /// Predict the total for the current year
    pub fn predict(&self) -> Result<YearlyForecastResult> {
        let mut total = 0;
        for month in 1..=12 {
            total += self.monthly.predict_month(month)?.total_predicted_contribution;
        }

        Ok(YearlyForecastResult {
            total_predicted_contribution: total,
            year: self.monthly.context().today.year(),
        })
    }
}

impl ForecastPipeline for YearlyTotalForecast<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::YearlyTotal
    }

    fn data_prep(&self) -> Result<TrainingSeries> {
        self.monthly.data_prep()
    }

    fn get_model(&mut self) -> Result<()> {
        self.monthly.get_model()
    }

    fn predictor(&self) -> &Predictor {
        self.monthly.predictor()
    }
}
