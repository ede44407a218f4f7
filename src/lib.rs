//! # Contrib Forecast Workspace
//!
//! Umbrella crate over the two workspace members:
//!
//! - [`regression_math`]: polynomial feature expansion, least squares and the
//!   degree-ladder model selector
//! - [`contrib_forecast`]: calendar loading and the forecast pipelines
//!
//! ## Example
//!
//! ```
//! use contrib_forecast_workspace::regression_math::{ModelSelector, TrainingSeries};
//!
//! let series = TrainingSeries::from_scalars(
//!     &[5.0, 15.0, 25.0, 35.0, 45.0, 55.0],
//!     &[5.0, 20.0, 14.0, 32.0, 22.0, 38.0],
//! )
//! .unwrap();
//! let predictor = ModelSelector::new(&series).compute_best_model().unwrap();
//! assert!(predictor.predict_one(&[25.0]).unwrap().is_finite());
//! ```

pub use contrib_forecast;
pub use regression_math;
