//! Polynomial feature expansion
//!
//! Expands a feature vector into every monomial of total degree less than or
//! equal to the requested degree, interaction terms included. For an input
//! `[a, b]` at degree 2 the output is `[a, b, a^2, ab, b^2]`, with a leading
//! `1` when the bias column is requested.

use crate::{MathError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Polynomial basis expansion with a fixed degree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
}

impl PolynomialFeatures {
    /// Create an expansion of the given degree without a bias column
    pub fn new(degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(MathError::InvalidInput(
                "Polynomial degree must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            degree,
            include_bias: false,
        })
    }

    /// Set whether the constant term is emitted
    pub fn with_include_bias(mut self, include_bias: bool) -> Self {
        self.include_bias = include_bias;
        self
    }

    /// Get the degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Whether the constant term is emitted
    pub fn include_bias(&self) -> bool {
        self.include_bias
    }

    /// Number of output columns for an input of `n_features`
    pub fn output_width(&self, n_features: usize) -> usize {
        // C(n + d, d) monomials including the constant
        let mut count: usize = 1;
        for k in 1..=self.degree {
            count = count * (n_features + k) / k;
        }
        if self.include_bias {
            count
        } else {
            count - 1
        }
    }

    /// Expand one feature vector
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.is_empty() {
            return Err(MathError::InvalidInput(
                "Cannot expand an empty feature vector".to_string(),
            ));
        }

        let mut out = Vec::with_capacity(self.output_width(x.len()));
        if self.include_bias {
            out.push(1.0);
        }

        // Degree-k terms led by feature i are x[i] times every degree-(k-1)
        // term whose leading feature is >= i. `starts[i]` is where those
        // terms begin in the previous block.
        let n = x.len();
        let first = out.len();
        out.extend_from_slice(x);
        let mut prev_block = first..out.len();
        let mut starts: Vec<usize> = (0..n).map(|i| first + i).collect();

        for _ in 2..=self.degree {
            let block_start = out.len();
            let mut next_starts = Vec::with_capacity(n);
            for (i, &xi) in x.iter().enumerate() {
                next_starts.push(out.len());
                for j in starts[i]..prev_block.end {
                    let term = out[j] * xi;
                    out.push(term);
                }
            }
            prev_block = block_start..out.len();
            starts = next_starts;
        }

        Ok(out)
    }

    /// Expand a scalar, promoted to a length-1 vector
    pub fn transform_scalar(&self, x: f64) -> Result<Vec<f64>> {
        self.transform(&[x])
    }

    /// Expand every row
    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

/// Expand `x` at `degree`; shorthand for [`PolynomialFeatures::transform`]
pub fn expand(x: &[f64], degree: usize, include_bias: bool) -> Result<Vec<f64>> {
    PolynomialFeatures::new(degree)?
        .with_include_bias(include_bias)
        .transform(x)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ExpansionKey {
    bits: Vec<u64>,
    degree: usize,
    include_bias: bool,
}

impl ExpansionKey {
    fn new(x: &[f64], degree: usize, include_bias: bool) -> Self {
        // Raw bit patterns, so -0.0 and 0.0 stay distinct and a hit is
        // bit-identical to a fresh expansion
        let bits = x.iter().map(|v| v.to_bits()).collect();
        Self {
            bits,
            degree,
            include_bias,
        }
    }
}

/// Bounded memo table for polynomial expansions.
///
/// Owned by a single pipeline and shared with its predictor through an `Arc`;
/// only prediction-time expansions go through it, since a ladder fit expands
/// each (row, degree) pair exactly once. Once `capacity` entries are stored,
/// further expansions are computed but not remembered.
#[derive(Debug)]
pub struct ExpansionCache {
    capacity: usize,
    entries: Mutex<HashMap<ExpansionKey, Arc<[f64]>>>,
    saturated: AtomicBool,
}

impl ExpansionCache {
    /// Create a cache holding at most `capacity` expansions
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
            saturated: AtomicBool::new(false),
        }
    }

    /// Create a cache wrapped in an `Arc`, ready to share
    pub fn shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }

    /// Expand `x`, reusing a stored result when available
    pub fn expand(&self, x: &[f64], degree: usize, include_bias: bool) -> Result<Arc<[f64]>> {
        let key = ExpansionKey::new(x, degree, include_bias);
        if let Some(hit) = self.entries.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let expanded: Arc<[f64]> = expand(x, degree, include_bias)?.into();

        let mut entries = self.entries.lock();
        if entries.len() < self.capacity {
            entries.insert(key, Arc::clone(&expanded));
        } else if !self.saturated.swap(true, Ordering::Relaxed) {
            warn!(
                capacity = self.capacity,
                "expansion cache is full, further expansions will not be memoized"
            );
        }

        Ok(expanded)
    }

    /// Number of stored expansions
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of stored expansions
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored expansion
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.saturated.store(false, Ordering::Relaxed);
    }
}
