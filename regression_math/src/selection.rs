//! Degree-ladder model selection
//!
//! Fits one polynomial regression per degree in `[2, max_degree)` and reduces
//! the ladder to a single candidate:
//!
//! 1. an equal score keeps the incumbent;
//! 2. a score of exactly 1.0 stops the scan and keeps the incumbent (the
//!    perfect fit itself is never adopted);
//! 3. when both scores are at least [`EXCELLENT_FIT`], the lower one wins;
//! 4. otherwise the higher one wins.

use crate::ols::LinearModel;
use crate::polynomial::{ExpansionCache, PolynomialFeatures};
use crate::predictor::Predictor;
use crate::series::TrainingSeries;
use crate::{MathError, Result};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lowest degree on the ladder
pub const MIN_DEGREE: usize = 2;

/// Exclusive upper bound of the ladder for ad-hoc use
pub const DEFAULT_MAX_DEGREE: usize = 10;

/// Score above which two candidates are both considered excellent
pub const EXCELLENT_FIT: f64 = 0.95;

/// One fitted rung of the degree ladder
#[derive(Debug, Clone)]
pub struct Candidate {
    degree: usize,
    model: LinearModel,
    score: f64,
}

impl Candidate {
    /// Polynomial degree of this candidate
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fitted model
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// R² on the training series
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Chooses a polynomial degree for a training series
#[derive(Debug, Clone)]
pub struct ModelSelector<'a> {
    series: &'a TrainingSeries,
    max_degree: usize,
    cache: Option<Arc<ExpansionCache>>,
}

impl<'a> ModelSelector<'a> {
    /// Create a selector with the ad-hoc ladder `[2, 10)`
    pub fn new(series: &'a TrainingSeries) -> Self {
        Self {
            series,
            max_degree: DEFAULT_MAX_DEGREE,
            cache: None,
        }
    }

    /// Set the exclusive upper bound of the degree ladder
    pub fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    /// Memo table handed to the selected predictor for prediction-time expansions
    pub fn with_cache(mut self, cache: Arc<ExpansionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Degrees that will be fitted
    pub fn degree_ladder(&self) -> Range<usize> {
        MIN_DEGREE..self.max_degree
    }

    fn check_preconditions(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(MathError::InsufficientData(
                "Model selection needs at least one sample".to_string(),
            ));
        }
        if self.degree_ladder().is_empty() {
            return Err(MathError::InvalidInput(format!(
                "max_degree must be greater than {}, got {}",
                MIN_DEGREE, self.max_degree
            )));
        }
        self.series.validate()
    }

    /// Fit a single rung of the ladder
    pub fn fit_candidate(&self, degree: usize) -> Result<Candidate> {
        let x = PolynomialFeatures::new(degree)?.transform_rows(self.series.features())?;
        let model = LinearModel::fit(&x, self.series.targets())?;
        let score = model.score(&x, self.series.targets())?;
        debug!(degree, score, "fitted ladder candidate");

        Ok(Candidate {
            degree,
            model,
            score,
        })
    }

    /// Fit every rung of the ladder, ordered by degree.
    ///
    /// A rung whose fit fails (for example because the expanded features
    /// overflow) is skipped; an error is returned only when no rung fits.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        self.check_preconditions()?;

        let mut candidates = Vec::new();
        for degree in self.degree_ladder() {
            match self.fit_candidate(degree) {
                Ok(candidate) => candidates.push(candidate),
                Err(err) => warn!(degree, error = %err, "skipping ladder candidate"),
            }
        }

        if candidates.is_empty() {
            return Err(MathError::CalculationError(format!(
                "No degree in {:?} could be fitted",
                self.degree_ladder()
            )));
        }
        Ok(candidates)
    }

    /// Fit the ladder and return a predictor bound to the selected candidate
    pub fn compute_best_model(&self) -> Result<Predictor> {
        let candidates = self.candidates()?;
        let scores: Vec<f64> = candidates.iter().map(Candidate::score).collect();
        let index = select_best_index(&scores).ok_or_else(|| {
            MathError::CalculationError("Degree ladder produced no candidates".to_string())
        })?;

        let Candidate {
            degree,
            model,
            score,
        } = candidates.into_iter().nth(index).ok_or_else(|| {
            MathError::CalculationError("Selected candidate is out of range".to_string())
        })?;
        info!(degree, score, samples = self.series.len(), "selected polynomial model");

        let n_features = self.series.width().unwrap_or_default();
        Ok(Predictor::trained(model, degree, n_features, self.cache.clone()))
    }
}

/// Reduce a ladder of scores to the index of the selected candidate.
///
/// Non-finite scores are never adopted; a non-finite incumbent is replaced by
/// the next finite score.
pub fn select_best_index(scores: &[f64]) -> Option<usize> {
    let mut best = 0;
    let mut best_score = *scores.first()?;

    for (i, &score) in scores.iter().enumerate().skip(1) {
        if !score.is_finite() {
            continue;
        }
        if !best_score.is_finite() {
            best = i;
            best_score = score;
            continue;
        }

        if score == best_score {
            continue;
        } else if score == 1.0 {
            break;
        } else if score >= EXCELLENT_FIT && best_score >= EXCELLENT_FIT {
            if score < best_score {
                best = i;
                best_score = score;
            }
        } else if score > best_score {
            best = i;
            best_score = score;
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_score_wins_below_threshold() {
        assert_eq!(select_best_index(&[0.5, 0.7, 0.6]), Some(1));
    }

    #[test]
    fn test_lower_score_wins_among_excellent() {
        assert_eq!(select_best_index(&[0.96, 0.99, 0.97]), Some(0));
        assert_eq!(select_best_index(&[0.99, 0.96, 0.98]), Some(1));
    }

    #[test]
    fn test_crossing_into_excellent_takes_higher() {
        assert_eq!(select_best_index(&[0.9, 0.97]), Some(1));
    }

    #[test]
    fn test_perfect_score_stops_without_adoption() {
        assert_eq!(select_best_index(&[0.5, 1.0, 0.9]), Some(0));
        assert_eq!(select_best_index(&[0.5, 0.8, 1.0, 0.99]), Some(1));
    }

    #[test]
    fn test_equal_scores_keep_incumbent() {
        assert_eq!(select_best_index(&[0.8, 0.8, 0.8]), Some(0));
        // an equal perfect score does not stop the scan
        assert_eq!(select_best_index(&[1.0, 1.0, 0.97]), Some(2));
    }

    #[test]
    fn test_first_perfect_candidate_may_be_kept() {
        // the opening candidate is adopted unconditionally
        assert_eq!(select_best_index(&[1.0]), Some(0));
    }

    #[test]
    fn test_non_finite_scores_skipped() {
        assert_eq!(select_best_index(&[f64::NAN, 0.4, 0.3]), Some(1));
        assert_eq!(select_best_index(&[0.4, f64::NAN, 0.3]), Some(0));
    }

    #[test]
    fn test_empty_scores() {
        assert_eq!(select_best_index(&[]), None);
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let series = TrainingSeries::new();
        let result = ModelSelector::new(&series).compute_best_model();
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_empty_ladder_is_rejected() {
        let series = TrainingSeries::from_scalars(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let result = ModelSelector::new(&series).with_max_degree(2).compute_best_model();
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_overflowing_rungs_are_skipped() {
        // x^4 overflows for x around 1e100
        let series =
            TrainingSeries::from_scalars(&[1e100, 2e100, 3e100], &[1.0, 2.0, 3.0]).unwrap();
        let selector = ModelSelector::new(&series).with_max_degree(6);

        let candidates = selector.candidates().unwrap();
        let degrees: Vec<usize> = candidates.iter().map(Candidate::degree).collect();
        assert_eq!(degrees, vec![2, 3]);

        let predictor = selector.compute_best_model().unwrap();
        assert!(matches!(predictor.degree(), Some(2) | Some(3)));
    }

    #[test]
    fn test_every_rung_overflowing_is_an_error() {
        let series = TrainingSeries::from_scalars(&[1e300, 2e300], &[1.0, 2.0]).unwrap();
        let result = ModelSelector::new(&series).compute_best_model();
        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_candidates_cover_ladder() {
        let series =
            TrainingSeries::from_scalars(&[1.0, 2.0, 3.0, 4.0], &[2.0, 1.0, 4.0, 3.0]).unwrap();
        let candidates = ModelSelector::new(&series).with_max_degree(6).candidates().unwrap();

        let degrees: Vec<usize> = candidates.iter().map(Candidate::degree).collect();
        assert_eq!(degrees, vec![2, 3, 4, 5]);
        assert!(candidates.iter().all(|c| c.score() <= 1.0 + 1e-12));
    }
}
