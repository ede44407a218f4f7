//! Error types for the contrib_forecast crate

use regression_math::MathError;
use thiserror::Error;

/// Custom error types for the contrib_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to calendar data processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Malformed or missing calendar fields
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Prediction requested from a pipeline whose series was empty
    #[error("model has not been trained")]
    ModelNotTrained,

    /// Error from the regression engine
    #[error("Math error: {0}")]
    MathError(MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing a JSON calendar snapshot
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Error reading a CSV calendar
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error reading configuration
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::NotTrained => ForecastError::ModelNotTrained,
            other => ForecastError::MathError(other),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
