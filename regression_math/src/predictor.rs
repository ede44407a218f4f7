//! Predictor bound to a selected polynomial model

use crate::ols::LinearModel;
use crate::polynomial::{ExpansionCache, PolynomialFeatures};
use crate::{MathError, Result};
use std::sync::Arc;

/// A fitted model together with the degree its inputs are expanded at
#[derive(Debug, Clone)]
pub struct TrainedPredictor {
    model: LinearModel,
    degree: usize,
    n_features: usize,
    cache: Option<Arc<ExpansionCache>>,
}

impl TrainedPredictor {
    /// Get the fitted linear model
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Get the polynomial degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Width of the raw (unexpanded) feature rows
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Predictor was trained on {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        match &self.cache {
            Some(cache) => {
                let expanded = cache.expand(row, self.degree, false)?;
                self.model.predict_row(&expanded)
            }
            None => {
                let expanded = PolynomialFeatures::new(self.degree)?.transform(row)?;
                self.model.predict_row(&expanded)
            }
        }
    }
}

/// Either a trained polynomial model or the untrained placeholder
#[derive(Debug, Clone, Default)]
pub enum Predictor {
    /// No model could be fitted (for example, the training series was empty)
    #[default]
    Untrained,
    /// A selected model ready for prediction
    Trained(TrainedPredictor),
}

impl Predictor {
    /// Bind a fitted model and its degree
    pub fn trained(
        model: LinearModel,
        degree: usize,
        n_features: usize,
        cache: Option<Arc<ExpansionCache>>,
    ) -> Self {
        Predictor::Trained(TrainedPredictor {
            model,
            degree,
            n_features,
            cache,
        })
    }

    /// Whether a model is bound
    pub fn is_trained(&self) -> bool {
        matches!(self, Predictor::Trained(_))
    }

    /// Degree of the bound model
    pub fn degree(&self) -> Option<usize> {
        match self {
            Predictor::Trained(trained) => Some(trained.degree),
            Predictor::Untrained => None,
        }
    }

    /// Predict one value per input row
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        match self {
            Predictor::Trained(trained) => {
                rows.iter().map(|row| trained.predict_row(row)).collect()
            }
            Predictor::Untrained => Err(MathError::NotTrained),
        }
    }

    /// Predict a single row
    pub fn predict_one(&self, row: &[f64]) -> Result<f64> {
        match self {
            Predictor::Trained(trained) => trained.predict_row(row),
            Predictor::Untrained => Err(MathError::NotTrained),
        }
    }
}
