//! Entry point that picks, trains and runs a pipeline for one request

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::pipelines::monthly::{MonthlyForecastResult, MonthlyTotalForecast};
use crate::pipelines::next_gap::{NextGapForecast, NextGapForecastResult};
use crate::pipelines::weekly::{WeeklyForecastResult, WeeklyTotalForecast};
use crate::pipelines::yearly::{YearlyForecastResult, YearlyTotalForecast};
use crate::pipelines::{ForecastContext, ForecastResponse, PipelineKind};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// A single forecast question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastRequest {
    /// Days until the next active day
    NextGap,
    /// Total of the week containing the date
    Week(NaiveDate),
    /// Total of a month, 1 to 12
    Month(u32),
    /// Total of the current year
    Year,
}

impl ForecastRequest {
    /// The pipeline that answers this request
    pub fn kind(&self) -> PipelineKind {
        match self {
            ForecastRequest::NextGap => PipelineKind::NextGap,
            ForecastRequest::Week(_) => PipelineKind::WeeklyTotal,
            ForecastRequest::Month(_) => PipelineKind::MonthlyTotal,
            ForecastRequest::Year => PipelineKind::YearlyTotal,
        }
    }
}

/// Result record of any pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ForecastReport {
    NextGap(NextGapForecastResult),
    Weekly(WeeklyForecastResult),
    Monthly(MonthlyForecastResult),
    Yearly(YearlyForecastResult),
}

/// Train the pipeline matching `request` and answer it.
///
/// Failures, including an untrained model, come back as
/// [`ForecastResponse::Error`] rather than as a Rust error.
pub fn run_forecast(
    calendar: &ContributionCalendar,
    request: ForecastRequest,
    config: &ForecastConfig,
    context: ForecastContext,
) -> ForecastResponse<ForecastReport> {
    debug!(pipeline = %request.kind(), days = calendar.len(), "running forecast");
    answer(calendar, request, config, context).into()
}

fn answer(
    calendar: &ContributionCalendar,
    request: ForecastRequest,
    config: &ForecastConfig,
    context: ForecastContext,
) -> Result<ForecastReport> {
    let config = config.clone();
    let report = match request {
        ForecastRequest::NextGap => {
            let pipeline = NextGapForecast::train(calendar, config, context)?;
            ForecastReport::NextGap(pipeline.predict_next()?)
        }
        ForecastRequest::Week(date) => {
            let pipeline = WeeklyTotalForecast::train(calendar, config, context)?;
            ForecastReport::Weekly(pipeline.predict_week(date)?)
        }
        ForecastRequest::Month(month) => {
            let pipeline = MonthlyTotalForecast::train(calendar, config, context)?;
            ForecastReport::Monthly(pipeline.predict_month(month)?)
        }
        ForecastRequest::Year => {
            let pipeline = YearlyTotalForecast::train(calendar, config, context)?;
            ForecastReport::Yearly(pipeline.predict()?)
        }
    };
    Ok(report)
}
