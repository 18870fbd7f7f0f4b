//! Sample and dataset types shared by the loader, metric engine and comparator.

use serde::{Deserialize, Serialize};

/// One row of a multiclass classifier's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassSample {
    /// Zero-based index of the true class.
    pub actual: usize,
    /// Predicted probability for each class, indexed by class.
    pub probabilities: Vec<f64>,
}

impl MulticlassSample {
    pub fn new(actual: usize, probabilities: Vec<f64>) -> Self {
        Self {
            actual,
            probabilities,
        }
    }
}

/// One row of a binary classifier's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinarySample {
    /// True label, 0 or 1.
    pub actual: u8,
    /// Predicted probability of the positive class.
    pub predicted: f64,
}

impl BinarySample {
    pub fn new(actual: u8, predicted: f64) -> Self {
        Self { actual, predicted }
    }

    pub fn is_positive(&self) -> bool {
        self.actual == 1
    }
}

/// One row of a regressor's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSample {
    pub actual: f64,
    pub predicted: f64,
}

impl RegressionSample {
    pub fn new(actual: f64, predicted: f64) -> Self {
        Self { actual, predicted }
    }

    pub fn error(&self) -> f64 {
        self.actual - self.predicted
    }
}

/// All samples read from one source, tagged with the source's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset<S> {
    pub name: String,
    pub samples: Vec<S>,
}

impl<S> Dataset<S> {
    pub fn new(name: impl Into<String>, samples: Vec<S>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
