//! Forecast configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables shared by the forecast pipelines
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Exclusive upper bound of the degree ladder used by the pipelines
    pub max_degree: usize,
    /// Weekly predictions above this multiple of the largest observed week become 0
    pub weekly_clamp_factor: f64,
    /// Monthly predictions above this multiple of the largest observed month become 0
    pub monthly_clamp_factor: f64,
    /// Upper bound for the predicted gap to the next active day
    pub max_gap_days: u32,
    /// Training series longer than this keep only their most recent samples
    pub max_training_samples: usize,
    /// Number of prediction-time polynomial expansions remembered per pipeline
    pub expansion_cache_capacity: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_degree: 20,
            weekly_clamp_factor: 2.0,
            monthly_clamp_factor: 3.0,
            max_gap_days: 365,
            max_training_samples: 1000,
            expansion_cache_capacity: 4096,
        }
    }
}

impl ForecastConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        let min = regression_math::selection::MIN_DEGREE;
        if self.max_degree <= min {
            return Err(ForecastError::InvalidParameter(format!(
                "max_degree must be greater than {}, got {}",
                min, self.max_degree
            )));
        }
        if !(self.weekly_clamp_factor > 0.0) || !(self.monthly_clamp_factor > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Clamp factors must be positive".to_string(),
            ));
        }
        if self.max_training_samples == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_training_samples must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
