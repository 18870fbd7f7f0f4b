//! Metric engine: pure functions from samples to scalar metrics.

pub mod binary;
pub mod confusion;
pub mod multiclass;
pub mod regression;

pub use binary::BinaryReport;
pub use confusion::ConfusionMatrix;
pub use multiclass::MulticlassReport;
pub use regression::RegressionReport;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether `p` is a finite probability within `[0, 1]`.
pub fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

impl Direction {
    /// Whether `candidate` strictly beats `current`.
    pub fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::LowerIsBetter => candidate < current,
            Self::HigherIsBetter => candidate > current,
        }
    }
}

/// Every scalar metric the engine can rank models by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Bce,
    Ce,
    Accuracy,
    Precision,
    Recall,
    F1,
    Auc,
    Mse,
    Mae,
    Mare,
}

impl Metric {
    pub fn direction(self) -> Direction {
        match self {
            Self::Bce | Self::Ce | Self::Mse | Self::Mae | Self::Mare => Direction::LowerIsBetter,
            Self::Accuracy | Self::Precision | Self::Recall | Self::F1 | Self::Auc => {
                Direction::HigherIsBetter
            }
        }
    }

    /// Human-readable name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bce => "BCE",
            Self::Ce => "CE",
            Self::Accuracy => "Accuracy",
            Self::Precision => "Precision",
            Self::Recall => "Recall",
            Self::F1 => "F1 Score",
            Self::Auc => "AUC ROC",
            Self::Mse => "MSE",
            Self::Mae => "MAE",
            Self::Mare => "MARE",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A per-dataset result that exposes the metrics it can be ranked by.
pub trait MetricSet {
    /// Rankable metrics in reporting order.
    fn metrics(&self) -> Vec<(Metric, f64)>;
}

impl MetricSet for BinaryReport {
    fn metrics(&self) -> Vec<(Metric, f64)> {
        vec![
            (Metric::Bce, self.bce),
            (Metric::Accuracy, self.accuracy),
            (Metric::Precision, self.precision),
            (Metric::Recall, self.recall),
            (Metric::F1, self.f1),
            (Metric::Auc, self.auc),
        ]
    }
}

impl MetricSet for MulticlassReport {
    fn metrics(&self) -> Vec<(Metric, f64)> {
        vec![
            (Metric::Ce, self.cross_entropy),
            (Metric::Accuracy, self.accuracy),
        ]
    }
}

impl MetricSet for RegressionReport {
    fn metrics(&self) -> Vec<(Metric, f64)> {
        vec![
            (Metric::Mse, self.mse),
            (Metric::Mae, self.mae),
            (Metric::Mare, self.mare),
        ]
    }
}
