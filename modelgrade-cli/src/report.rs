//! Console rendering of comparison results.

use modelgrade_core::{
    BinaryReport, Comparison, ConfusionMatrix, MulticlassReport, RegressionReport,
};
use serde::Serialize;
use std::fmt;

/// Per-dataset section of the text report.
pub trait RenderReport {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl RenderReport for BinaryReport {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cm = &self.confusion_matrix;
        writeln!(f, "BCE = {:.7}", self.bce)?;
        writeln!(f, "Confusion Matrix (threshold {})", self.threshold)?;
        writeln!(f, "\ty=1\ty=0")?;
        writeln!(f, "y^=1\t{}\t{}", cm.true_positives(), cm.false_positives())?;
        writeln!(f, "y^=0\t{}\t{}", cm.false_negatives(), cm.true_negatives())?;
        writeln!(f, "Accuracy = {:.4}", self.accuracy)?;
        writeln!(f, "Precision = {:.7}", self.precision)?;
        writeln!(f, "Recall = {:.7}", self.recall)?;
        writeln!(f, "F1 Score = {:.7}", self.f1)?;
        writeln!(f, "AUC ROC = {:.7}", self.auc)
    }
}

impl RenderReport for MulticlassReport {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CE = {:.7}", self.cross_entropy)?;
        writeln!(f, "Confusion Matrix")?;
        write_class_matrix(f, &self.confusion_matrix)?;
        writeln!(f, "Accuracy = {:.4}", self.accuracy)
    }
}

impl RenderReport for RegressionReport {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MSE = {:.7}", self.mse)?;
        writeln!(f, "MAE = {:.7}", self.mae)?;
        writeln!(f, "MARE = {:.7}", self.mare)
    }
}

/// Rows are predicted classes, columns actual classes, both 1-based.
fn write_class_matrix(f: &mut fmt::Formatter<'_>, cm: &ConfusionMatrix) -> fmt::Result {
    for actual in 1..=cm.n_classes() {
        write!(f, "\ty={actual}")?;
    }
    writeln!(f)?;
    for (i, row) in cm.rows().iter().enumerate() {
        write!(f, "y^={}", i + 1)?;
        for count in row {
            write!(f, "\t{count}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Human-readable report for a whole comparison.
pub struct TextReport<'a, R>(pub &'a Comparison<R>);

impl<R: RenderReport> fmt::Display for TextReport<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparison = self.0;

        for skipped in &comparison.skipped {
            writeln!(f, "Error reading file: {} ({})", skipped.name, skipped.reason)?;
        }
        if !comparison.skipped.is_empty() {
            writeln!(f)?;
        }

        for evaluation in &comparison.evaluations {
            writeln!(
                f,
                "Results for {} ({} samples)",
                evaluation.name, evaluation.samples
            )?;
            evaluation.report.render(f)?;
            writeln!(f)?;
        }

        for (metric, best) in comparison.summary() {
            match best {
                Some(best) => writeln!(
                    f,
                    "According to {metric}, the best model is {}",
                    best.source
                )?,
                None => writeln!(f, "According to {metric}, no model qualified")?,
            }
        }
        Ok(())
    }
}

/// Pretty JSON rendering of a comparison.
pub fn to_json<R: Serialize>(comparison: &Comparison<R>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(comparison)
}
