//! Confusion matrix accumulation.

use serde::{Deserialize, Serialize};

/// Square count matrix indexed `[predicted][actual]`.
///
/// Cells only ever increment, so the sum of all cells always equals the
/// number of recorded samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    cells: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self {
            cells: vec![vec![0; n_classes]; n_classes],
        }
    }

    /// Create an all-zero 2x2 matrix for binary classification.
    pub fn binary() -> Self {
        Self::new(2)
    }

    /// Record one prediction.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the matrix. Validate samples first
    /// (see `BinaryReport::try_compute` and `MulticlassReport::try_compute`).
    pub fn record(&mut self, predicted: usize, actual: usize) {
        self.cells[predicted][actual] += 1;
    }

    /// Count for one `(predicted, actual)` cell.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the matrix.
    pub fn get(&self, predicted: usize, actual: usize) -> usize {
        self.cells[predicted][actual]
    }

    pub fn n_classes(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Total number of recorded samples.
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// Samples on the diagonal, i.e. predicted correctly.
    pub fn correct(&self) -> usize {
        (0..self.n_classes()).map(|i| self.cells[i][i]).sum()
    }

    /// Fraction of samples on the diagonal. `NaN` for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        self.correct() as f64 / self.total() as f64
    }

    /// Samples whose actual class is `class`.
    ///
    /// # Panics
    ///
    /// Panics if `class >= n_classes()` on a non-empty matrix.
    pub fn actual_count(&self, class: usize) -> usize {
        self.cells.iter().map(|row| row[class]).sum()
    }

    /// Samples predicted as `class`.
    ///
    /// # Panics
    ///
    /// Panics if `class >= n_classes()`.
    pub fn predicted_count(&self, class: usize) -> usize {
        self.cells[class].iter().sum()
    }

    // Binary views. Class 1 is the positive class; these panic on a matrix
    // with fewer than two classes.

    pub fn true_positives(&self) -> usize {
        self.cells[1][1]
    }

    pub fn true_negatives(&self) -> usize {
        self.cells[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.cells[1][0]
    }

    pub fn false_negatives(&self) -> usize {
        self.cells[0][1]
    }
}
