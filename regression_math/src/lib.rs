//! # Regression Math
//!
//! Numerical building blocks for calendar forecasting.
//! This crate provides polynomial feature expansion, ordinary least squares
//! fitting and the degree-ladder model selection used by the forecast
//! pipelines.
//!
//! ## Example
//!
//! ```
//! use regression_math::{ModelSelector, TrainingSeries};
//!
//! let series = TrainingSeries::from_scalars(
//!     &[5.0, 15.0, 25.0, 35.0, 45.0, 55.0],
//!     &[5.0, 20.0, 14.0, 32.0, 22.0, 38.0],
//! )
//! .unwrap();
//!
//! let predictor = ModelSelector::new(&series).compute_best_model().unwrap();
//! let value = predictor.predict_one(&[25.0]).unwrap();
//! assert!(value.is_finite());
//! ```

use thiserror::Error;

pub mod ols;
pub mod polynomial;
pub mod predictor;
pub mod selection;
pub mod series;

pub use crate::ols::LinearModel;
pub use crate::polynomial::{ExpansionCache, PolynomialFeatures};
pub use crate::predictor::{Predictor, TrainedPredictor};
pub use crate::selection::{Candidate, ModelSelector};
pub use crate::series::TrainingSeries;

/// Errors that can occur in regression calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("model has not been trained")]
    NotTrained,
}

/// Result type for regression math operations
pub type Result<T> = std::result::Result<T, MathError>;
