//! Multiclass cross-entropy and confusion matrix.

use serde::{Deserialize, Serialize};

use super::{ConfusionMatrix, is_probability};
use crate::error::EvalError;
use crate::sample::MulticlassSample;

/// Index of the largest value. Ties resolve to the lowest index.
///
/// Returns 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Check that every sample has `n_classes` probabilities and an actual class
/// below `n_classes`.
pub fn validate(samples: &[MulticlassSample], n_classes: usize) -> Result<(), EvalError> {
    for (index, s) in samples.iter().enumerate() {
        if s.probabilities.len() != n_classes {
            return Err(EvalError::invalid_sample(
                index,
                format!(
                    "expected {n_classes} probabilities, found {}",
                    s.probabilities.len()
                ),
            ));
        }
        if s.actual >= n_classes {
            return Err(EvalError::invalid_sample(
                index,
                format!("class {} is outside 0..{n_classes}", s.actual),
            ));
        }
        if let Some(p) = s.probabilities.iter().find(|p| !is_probability(**p)) {
            return Err(EvalError::invalid_sample(
                index,
                format!("probability {p} is outside [0, 1]"),
            ));
        }
    }
    Ok(())
}

/// Mean negative log-probability assigned to the actual class.
///
/// A zero probability on the actual class makes the result `+inf`.
pub fn cross_entropy(samples: &[MulticlassSample]) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|s| s.probabilities[s.actual].ln())
        .sum();
    -total / samples.len() as f64
}

/// Confusion matrix built from the argmax of each probability vector.
pub fn confusion_matrix(samples: &[MulticlassSample], n_classes: usize) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::new(n_classes);
    for s in samples {
        cm.record(argmax(&s.probabilities), s.actual);
    }
    cm
}

/// Everything computed for one multiclass dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassReport {
    pub cross_entropy: f64,
    pub accuracy: f64,
    pub confusion_matrix: ConfusionMatrix,
}

impl MulticlassReport {
    /// Validate the samples against `n_classes`, then compute.
    pub fn try_compute(samples: &[MulticlassSample], n_classes: usize) -> Result<Self, EvalError> {
        validate(samples, n_classes)?;
        Ok(Self::compute(samples, n_classes))
    }

    /// # Panics
    ///
    /// Panics if a sample's class or probability vector doesn't fit
    /// `n_classes`. Use [`try_compute`](Self::try_compute) for samples that
    /// haven't been validated.
    pub fn compute(samples: &[MulticlassSample], n_classes: usize) -> Self {
        let confusion_matrix = confusion_matrix(samples, n_classes);
        Self {
            cross_entropy: cross_entropy(samples),
            accuracy: confusion_matrix.accuracy(),
            confusion_matrix,
        }
    }
}
