//! # Contrib Forecast
//!
//! Forecasting on top of a daily contribution calendar.
//!
//! ## Features
//!
//! - Calendar loading from GraphQL JSON snapshots or `date,contributionCount` CSV
//! - ISO-week and calendar-month aggregation of daily counts
//! - Four pipelines: days until the next active day, weekly, monthly and yearly totals
//! - Polynomial model selection over a degree ladder (see `regression_math`)
//! - TOML configuration of the degree ladder, clamps and resource caps
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use contrib_forecast::calendar::{ContributionCalendar, DayRecord};
//! use contrib_forecast::config::ForecastConfig;
//! use contrib_forecast::pipelines::{run_forecast, ForecastContext, ForecastRequest};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let days = (0..90)
//!     .map(|i| DayRecord::new(start + Duration::days(i), (i % 4) as u32))
//!     .collect();
//! let calendar = ContributionCalendar::from_days(days).unwrap();
//!
//! let config = ForecastConfig {
//!     max_degree: 5,
//!     ..ForecastConfig::default()
//! };
//! let context = ForecastContext::new(NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
//!
//! let response = run_forecast(&calendar, ForecastRequest::Month(2), &config, context);
//! println!("{}", serde_json::to_string(&response).unwrap());
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod periods;
pub mod pipelines;

// Re-export commonly used types
pub use crate::calendar::{ContributionCalendar, DayRecord};
pub use crate::config::ForecastConfig;
pub use crate::error::{ForecastError, Result};
pub use crate::pipelines::{
    run_forecast, ForecastContext, ForecastPipeline, ForecastReport, ForecastRequest,
    ForecastResponse, PipelineKind,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
