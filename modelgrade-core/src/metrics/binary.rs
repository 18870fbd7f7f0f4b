//! Binary classification metrics: BCE, thresholded confusion matrix, derived
//! ratios and ROC-AUC.
//!
//! Ratios are computed without guarding their denominators. A dataset with no
//! positive predictions has `NaN` precision, one without positives has `NaN`
//! recall and AUC, and so on. Callers that rank models treat non-finite values
//! as unrankable.

use serde::{Deserialize, Serialize};

use super::{ConfusionMatrix, is_probability};
use crate::error::EvalError;
use crate::sample::BinarySample;

/// Default decision threshold for the reported confusion matrix.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default number of threshold steps in the ROC sweep (101 points).
pub const DEFAULT_AUC_STEPS: usize = 100;

/// Check that every label is 0 or 1 and every prediction is a probability.
pub fn validate(samples: &[BinarySample]) -> Result<(), EvalError> {
    for (index, s) in samples.iter().enumerate() {
        if s.actual > 1 {
            return Err(EvalError::invalid_sample(
                index,
                format!("label {} is not 0 or 1", s.actual),
            ));
        }
        if !is_probability(s.predicted) {
            return Err(EvalError::invalid_sample(
                index,
                format!("probability {} is outside [0, 1]", s.predicted),
            ));
        }
    }
    Ok(())
}

/// Mean binary cross-entropy.
pub fn binary_cross_entropy(samples: &[BinarySample]) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|s| {
            let a = f64::from(s.actual);
            a * s.predicted.ln() + (1.0 - a) * (1.0 - s.predicted).ln()
        })
        .sum();
    -total / samples.len() as f64
}

/// Confusion matrix where a sample is predicted positive iff
/// `predicted >= threshold`.
pub fn confusion_matrix(samples: &[BinarySample], threshold: f64) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::binary();
    for s in samples {
        let predicted = usize::from(s.predicted >= threshold);
        cm.record(predicted, usize::from(s.actual));
    }
    cm
}

pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    (cm.true_positives() + cm.true_negatives()) as f64 / cm.total() as f64
}

pub fn precision(cm: &ConfusionMatrix) -> f64 {
    let tp = cm.true_positives() as f64;
    tp / (tp + cm.false_positives() as f64)
}

pub fn recall(cm: &ConfusionMatrix) -> f64 {
    let tp = cm.true_positives() as f64;
    tp / (tp + cm.false_negatives() as f64)
}

/// Harmonic mean of precision and recall.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    2.0 * precision * recall / (precision + recall)
}

/// One point of the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub tpr: f64,
    pub fpr: f64,
}

/// Sweep `steps + 1` evenly spaced thresholds over `[0, 1]` in increasing
/// order and record TPR/FPR at each.
pub fn roc_curve(samples: &[BinarySample], steps: usize) -> Vec<RocPoint> {
    let positives = samples.iter().filter(|s| s.is_positive()).count() as f64;
    let negatives = samples.len() as f64 - positives;

    (0..=steps)
        .map(|i| {
            let threshold = i as f64 / steps as f64;
            let cm = confusion_matrix(samples, threshold);
            RocPoint {
                threshold,
                tpr: cm.true_positives() as f64 / positives,
                fpr: cm.false_positives() as f64 / negatives,
            }
        })
        .collect()
}

/// Trapezoidal area under a ROC curve, taken over consecutive points in the
/// order given.
pub fn trapezoid_area(curve: &[RocPoint]) -> f64 {
    curve
        .windows(2)
        .map(|w| (w[0].tpr + w[1].tpr) / 2.0 * (w[0].fpr - w[1].fpr).abs())
        .sum()
}

/// ROC-AUC over a `steps + 1` threshold sweep.
pub fn auc(samples: &[BinarySample], steps: usize) -> f64 {
    trapezoid_area(&roc_curve(samples, steps))
}

/// Everything computed for one binary dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryReport {
    pub threshold: f64,
    pub bce: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub auc: f64,
}

impl BinaryReport {
    /// Validate the samples, then compute.
    pub fn try_compute(
        samples: &[BinarySample],
        threshold: f64,
        auc_steps: usize,
    ) -> Result<Self, EvalError> {
        validate(samples)?;
        Ok(Self::compute(samples, threshold, auc_steps))
    }

    /// # Panics
    ///
    /// Panics on a label other than 0 or 1. Use [`try_compute`](Self::try_compute)
    /// for samples that haven't been validated.
    pub fn compute(samples: &[BinarySample], threshold: f64, auc_steps: usize) -> Self {
        let cm = confusion_matrix(samples, threshold);
        let precision = precision(&cm);
        let recall = recall(&cm);
        Self {
            threshold,
            bce: binary_cross_entropy(samples),
            accuracy: accuracy(&cm),
            precision,
            recall,
            f1: f1_score(precision, recall),
            auc: auc(samples, auc_steps),
            confusion_matrix: cm,
        }
    }
}
