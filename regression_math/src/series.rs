//! Training series: the (X, Y) pairs handed to the model selector

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// An ordered collection of samples, each a feature row and a target value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSeries {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
}

impl TrainingSeries {
    /// Create an empty training series
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a training series from feature rows and targets
    pub fn from_parts(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) and targets ({}) must have the same length",
                x.len(),
                y.len()
            )));
        }

        let series = Self { x, y };
        series.validate()?;
        Ok(series)
    }

    /// Create a single-feature series; each scalar becomes a length-1 row
    pub fn from_scalars(x: &[f64], y: &[f64]) -> Result<Self> {
        Self::from_parts(x.iter().map(|&v| vec![v]).collect(), y.to_vec())
    }

    /// Append one sample
    pub fn push(&mut self, x: Vec<f64>, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    /// Feature rows
    pub fn features(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// Target values
    pub fn targets(&self) -> &[f64] {
        &self.y
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Width of the feature rows, if there is at least one sample
    pub fn width(&self) -> Option<usize> {
        self.x.first().map(Vec::len)
    }

    /// Largest target value, if any
    pub fn max_target(&self) -> Option<f64> {
        self.y.iter().copied().reduce(f64::max)
    }

    /// Keep only the most recent `max_len` samples. Returns how many were dropped.
    pub fn truncate_to_recent(&mut self, max_len: usize) -> usize {
        if self.len() <= max_len {
            return 0;
        }

        let dropped = self.len() - max_len;
        self.x.drain(..dropped);
        self.y.drain(..dropped);
        dropped
    }

    /// Check that every row has the same non-zero width and all values are finite
    pub fn validate(&self) -> Result<()> {
        let Some(width) = self.width() else {
            return Ok(());
        };

        if width == 0 {
            return Err(MathError::InvalidInput(
                "Feature rows must not be empty".to_string(),
            ));
        }

        for (i, (row, target)) in self.x.iter().zip(&self.y).enumerate() {
            if row.len() != width {
                return Err(MathError::InvalidInput(format!(
                    "Row {} has {} features, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
            if row.iter().any(|v| !v.is_finite()) || !target.is_finite() {
                return Err(MathError::InvalidInput(format!(
                    "Sample {} contains a non-finite value",
                    i
                )));
            }
        }

        Ok(())
    }
}
