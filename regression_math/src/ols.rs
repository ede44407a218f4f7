//! Ordinary least squares with an intercept
//!
//! The design matrix and target are centered, the minimum-norm solution is
//! taken from an SVD, and the intercept is recovered from the means. Rank
//! deficient and under-determined designs (more columns than rows, which the
//! high end of the degree ladder routinely produces) still yield a fit.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector, SVD};
use serde::{Deserialize, Serialize};

/// Upper bound on SVD sweeps before a fit is abandoned
const MAX_SVD_ITERATIONS: usize = 10_000;

/// A fitted linear model `y = intercept + coefficients . x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Fit the model to feature rows `x` and targets `y`
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        if x.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a linear model without samples".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) and targets ({}) must have the same length",
                x.len(),
                y.len()
            )));
        }

        let n = x.len();
        let p = x[0].len();
        if p == 0 || x.iter().any(|row| row.len() != p) {
            return Err(MathError::InvalidInput(
                "Feature rows must share the same non-zero width".to_string(),
            ));
        }

        let mut means = vec![0.0; p];
        for row in x {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }
        let y_mean = y.iter().sum::<f64>() / n as f64;

        let design = DMatrix::from_fn(n, p, |i, j| x[i][j] - means[j]);
        let target = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

        // Overflowed expansions turn into NaN once centered, and the SVD
        // iteration does not converge on them
        if !design.iter().all(|v| v.is_finite()) || !target.iter().all(|v| v.is_finite()) {
            return Err(MathError::CalculationError(
                "Design matrix or target is not finite".to_string(),
            ));
        }

        let svd = SVD::try_new(design, true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
            .ok_or_else(|| {
                MathError::CalculationError(format!(
                    "SVD did not converge within {} iterations",
                    MAX_SVD_ITERATIONS
                ))
            })?;
        let max_singular = svd.singular_values.iter().copied().fold(0.0, f64::max);
        if !max_singular.is_finite() {
            return Err(MathError::CalculationError(
                "Design matrix has non-finite singular values".to_string(),
            ));
        }
        let eps = max_singular * n.max(p) as f64 * f64::EPSILON;

        let beta = svd
            .solve(&target, eps)
            .map_err(|e| MathError::CalculationError(e.to_string()))?;

        let coefficients: Vec<f64> = beta.iter().copied().collect();
        if !coefficients.iter().all(|c| c.is_finite()) {
            return Err(MathError::CalculationError(
                "Least squares solution is not finite".to_string(),
            ));
        }
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&means)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Fitted coefficients, one per feature column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of feature columns the model expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate one feature row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, v)| c * v)
                .sum::<f64>())
    }

    /// Evaluate every row
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Coefficient of determination of the model on `x`, `y`
    pub fn score(&self, x: &[Vec<f64>], y: &[f64]) -> Result<f64> {
        let predicted = self.predict(x)?;
        r_squared(y, &predicted)
    }
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(
            "Actual and predicted values must have the same non-zero length".to_string(),
        ));
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_total == 0.0 {
        return Ok(if ss_residual == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_residual / ss_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_exact_line() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let y = vec![3.0, 5.0, 7.0, 9.0];
        let model = LinearModel::fit(&x, &y).unwrap();

        assert_relative_eq!(model.coefficients()[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(model.intercept(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(model.predict_row(&[10.0]).unwrap(), 21.0, epsilon = 1e-9);
        assert!(model.score(&x, &y).unwrap() > 0.999_999);
    }

    #[test]
    fn test_fit_two_features() {
        // y = 1 + 2a - 3b
        let x = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 3.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.0 + 2.0 * r[0] - 3.0 * r[1]).collect();
        let model = LinearModel::fit(&x, &y).unwrap();

        assert_relative_eq!(model.coefficients()[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(model.coefficients()[1], -3.0, epsilon = 1e-9);
        assert_relative_eq!(model.intercept(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_underdetermined_design_still_fits() {
        // three samples, five columns
        let x = vec![
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
            vec![2.0, 4.0, 8.0, 16.0, 32.0],
            vec![3.0, 9.0, 27.0, 81.0, 243.0],
        ];
        let y = vec![1.0, 5.0, 2.0];
        let model = LinearModel::fit(&x, &y).unwrap();

        let predicted = model.predict(&x).unwrap();
        for (p, a) in predicted.iter().zip(&y) {
            assert_relative_eq!(*p, *a, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_single_sample() {
        let model = LinearModel::fit(&[vec![4.0]], &[7.0]).unwrap();
        assert_relative_eq!(model.predict_row(&[100.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_fit_errors() {
        assert!(matches!(
            LinearModel::fit(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(LinearModel::fit(&[vec![1.0]], &[1.0, 2.0]).is_err());
        assert!(LinearModel::fit(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_non_finite_design_is_rejected_before_decomposition() {
        // the column mean overflows, so centering produces NaN
        let x = vec![vec![1.7e308], vec![1.7e308], vec![1.0]];
        assert!(matches!(
            LinearModel::fit(&x, &[1.0, 2.0, 3.0]),
            Err(MathError::CalculationError(_))
        ));

        let x = vec![vec![1.0], vec![f64::INFINITY]];
        assert!(matches!(
            LinearModel::fit(&x, &[1.0, 2.0]),
            Err(MathError::CalculationError(_))
        ));

        let x = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            LinearModel::fit(&x, &[1.0, f64::NAN]),
            Err(MathError::CalculationError(_))
        ));
    }

    #[test]
    fn test_predict_row_width_mismatch() {
        let model = LinearModel::fit(&[vec![1.0], vec![2.0]], &[1.0, 2.0]).unwrap();
        assert!(model.predict_row(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_r_squared_constant_target() {
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_r_squared_mean_prediction_is_zero() {
        let actual = [1.0, 2.0, 3.0];
        assert_relative_eq!(r_squared(&actual, &[2.0, 2.0, 2.0]).unwrap(), 0.0);
    }
}
