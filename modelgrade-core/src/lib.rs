//! # modelgrade-core — Model Output Evaluation
//!
//! Computes evaluation metrics for classifier and regressor outputs and picks
//! the best-scoring model file per metric.
//!
//! - **Metric engine** ([`metrics`]) — pure functions: binary and multiclass
//!   cross-entropy, confusion matrices, accuracy/precision/recall/F1, ROC-AUC,
//!   MSE/MAE/MARE
//! - **Loading** ([`loader`]) — the [`DatasetLoader`] seam and a CSV implementation
//! - **Comparison** ([`comparator`]) — evaluates many datasets, skipping the
//!   ones that fail to load or validate, and folds results into a [`BestModelTracker`]

pub mod comparator;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod sample;

// Re-exports
pub use comparator::{BestModelTracker, Comparison, Evaluation, MetricResult, ModelComparator};
pub use config::{EvalConfig, OutputFormat, load_config};
pub use error::EvalError;
pub use loader::{BinaryFormat, CsvLoader, DatasetLoader, MulticlassFormat, RegressionFormat};
pub use metrics::{
    BinaryReport, ConfusionMatrix, Direction, Metric, MetricSet, MulticlassReport,
    RegressionReport,
};
pub use sample::{BinarySample, Dataset, MulticlassSample, RegressionSample};

use std::path::Path;

/// Compare binary classifier output files under `root`.
pub fn compare_binary(
    root: &Path,
    config: &EvalConfig,
) -> Result<Comparison<BinaryReport>, EvalError> {
    let binary = &config.binary;
    ModelComparator::new(CsvLoader::new(root, BinaryFormat)).compare_any(&binary.files, |s| {
        BinaryReport::try_compute(s, binary.threshold, binary.auc_steps)
    })
}

/// Compare multiclass classifier output files under `root`.
pub fn compare_multiclass(
    root: &Path,
    config: &EvalConfig,
) -> Result<Comparison<MulticlassReport>, EvalError> {
    let multiclass = &config.multiclass;
    let format = MulticlassFormat::new(multiclass.num_classes);
    ModelComparator::new(CsvLoader::new(root, format)).compare_any(&multiclass.files, |s| {
        MulticlassReport::try_compute(s, multiclass.num_classes)
    })
}

/// Compare regressor output files under `root`.
pub fn compare_regression(
    root: &Path,
    config: &EvalConfig,
) -> Result<Comparison<RegressionReport>, EvalError> {
    let regression = &config.regression;
    ModelComparator::new(CsvLoader::new(root, RegressionFormat)).compare_any(
        &regression.files,
        |s| Ok(RegressionReport::compute(s, regression.mare_epsilon)),
    )
}
