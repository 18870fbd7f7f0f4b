//! Regression error metrics.

use serde::{Deserialize, Serialize};

use crate::sample::RegressionSample;

/// Added to `|actual|` in MARE so an exact zero target doesn't divide by zero.
pub const DEFAULT_MARE_EPSILON: f64 = 1e-10;

/// Mean squared error.
pub fn mse(samples: &[RegressionSample]) -> f64 {
    samples.iter().map(|s| s.error().powi(2)).sum::<f64>() / samples.len() as f64
}

/// Mean absolute error.
pub fn mae(samples: &[RegressionSample]) -> f64 {
    samples.iter().map(|s| s.error().abs()).sum::<f64>() / samples.len() as f64
}

/// Mean absolute relative error, as a percentage.
pub fn mare(samples: &[RegressionSample], epsilon: f64) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|s| s.error().abs() / (s.actual.abs() + epsilon))
        .sum();
    100.0 * total / samples.len() as f64
}

/// Everything computed for one regression dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub mse: f64,
    pub mae: f64,
    pub mare: f64,
}

impl RegressionReport {
    pub fn compute(samples: &[RegressionSample], mare_epsilon: f64) -> Self {
        Self {
            mse: mse(samples),
            mae: mae(samples),
            mare: mare(samples, mare_epsilon),
        }
    }
}
