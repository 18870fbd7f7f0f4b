//! Model comparison across datasets.
//!
//! Each dataset is loaded, evaluated and folded into a [`BestModelTracker`].
//! A dataset that fails to load or evaluate is logged and skipped; the rest
//! still run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EvalError;
use crate::loader::DatasetLoader;
use crate::metrics::{Metric, MetricSet};

/// A metric value and the dataset that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: Metric,
    pub value: f64,
    pub source: String,
}

/// Best value seen so far per metric.
///
/// Comparisons are strict, so ties keep the first-seen dataset. Non-finite
/// values (`NaN` from an undefined ratio, infinite losses) never become best.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestModelTracker {
    best: BTreeMap<Metric, MetricResult>,
}

impl BestModelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consider one metric value from `source`.
    pub fn observe(&mut self, metric: Metric, value: f64, source: &str) {
        if !value.is_finite() {
            return;
        }
        let improves = match self.best.get(&metric) {
            Some(current) => metric.direction().improves(value, current.value),
            None => true,
        };
        if improves {
            self.best.insert(
                metric,
                MetricResult {
                    metric,
                    value,
                    source: source.to_string(),
                },
            );
        }
    }

    /// Fold every metric of one evaluated dataset into the tracker.
    pub fn with<R: MetricSet>(mut self, source: &str, report: &R) -> Self {
        for (metric, value) in report.metrics() {
            self.observe(metric, value, source);
        }
        self
    }

    /// Build a tracker from `(source, report)` pairs in order.
    pub fn from_reports<'a, R, I>(reports: I) -> Self
    where
        R: MetricSet + 'a,
        I: IntoIterator<Item = (&'a str, &'a R)>,
    {
        reports
            .into_iter()
            .fold(Self::new(), |tracker, (source, report)| tracker.with(source, report))
    }

    pub fn best(&self, metric: Metric) -> Option<&MetricResult> {
        self.best.get(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricResult> {
        self.best.values()
    }
}

/// A dataset that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDataset {
    pub name: String,
    pub reason: String,
}

/// One evaluated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation<R> {
    pub name: String,
    pub samples: usize,
    pub report: R,
}

/// Everything produced by a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison<R> {
    pub evaluations: Vec<Evaluation<R>>,
    pub skipped: Vec<SkippedDataset>,
    /// Metrics in the order the reporter should summarize them.
    pub metrics: Vec<Metric>,
    pub best: BestModelTracker,
}

impl<R> Comparison<R> {
    /// Best result per metric in reporting order. `None` when no dataset
    /// produced a finite value for that metric.
    pub fn summary(&self) -> Vec<(Metric, Option<&MetricResult>)> {
        self.metrics
            .iter()
            .map(|&metric| (metric, self.best.best(metric)))
            .collect()
    }
}

/// Runs one evaluation function over a list of datasets.
pub struct ModelComparator<L> {
    loader: L,
}

impl<L: DatasetLoader> ModelComparator<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Evaluate every dataset in `ids`, in order.
    ///
    /// `evaluate` rejects samples it cannot score by returning an error. That
    /// dataset is skipped like one that failed to load.
    pub fn compare<R, E>(&self, ids: &[String], evaluate: E) -> Comparison<R>
    where
        R: MetricSet,
        E: Fn(&[L::Sample]) -> Result<R, EvalError>,
    {
        let mut evaluations = Vec::new();
        let mut skipped = Vec::new();
        let mut best = BestModelTracker::new();
        let mut metrics: Vec<Metric> = Vec::new();

        for id in ids {
            let evaluated = self.loader.load(id).and_then(|dataset| {
                let report = evaluate(dataset.samples.as_slice())?;
                Ok((dataset, report))
            });
            let (dataset, report) = match evaluated {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(dataset = %id, error = %e, "Skipping dataset");
                    skipped.push(SkippedDataset {
                        name: id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for (metric, _) in report.metrics() {
                if !metrics.contains(&metric) {
                    metrics.push(metric);
                }
            }
            best = best.with(&dataset.name, &report);
            tracing::info!(dataset = %dataset.name, samples = dataset.len(), "Evaluated dataset");

            evaluations.push(Evaluation {
                samples: dataset.len(),
                name: dataset.name,
                report,
            });
        }

        Comparison {
            evaluations,
            skipped,
            metrics,
            best,
        }
    }

    /// Like [`compare`](Self::compare) but fails if no dataset could be
    /// evaluated at all.
    pub fn compare_any<R, E>(&self, ids: &[String], evaluate: E) -> Result<Comparison<R>, EvalError>
    where
        R: MetricSet,
        E: Fn(&[L::Sample]) -> Result<R, EvalError>,
    {
        if ids.is_empty() {
            return Err(EvalError::invalid_input("no datasets to compare"));
        }
        let comparison = self.compare(ids, evaluate);
        if comparison.evaluations.is_empty() {
            return Err(EvalError::invalid_input(format!(
                "none of the {} datasets could be evaluated",
                ids.len()
            )));
        }
        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BinaryReport, RegressionReport};
    use crate::sample::{BinarySample, Dataset, RegressionSample};
    use std::collections::HashMap;

    struct MemoryLoader<S>(HashMap<String, Vec<S>>);

    impl<S: Clone> DatasetLoader for MemoryLoader<S> {
        type Sample = S;

        fn load(&self, id: &str) -> Result<Dataset<S>, EvalError> {
            self.0
                .get(id)
                .map(|s| Dataset::new(id, s.clone()))
                .ok_or_else(|| EvalError::empty_dataset(id))
        }
    }

    fn report(mse: f64) -> RegressionReport {
        RegressionReport {
            mse,
            mae: 1.0,
            mare: 1.0,
        }
    }

    #[test]
    fn test_lower_is_better_selects_minimum() {
        let reports = [("a", report(0.2)), ("b", report(0.1)), ("c", report(0.3))];
        let tracker = BestModelTracker::from_reports(reports.iter().map(|(n, r)| (*n, r)));
        assert_eq!(tracker.best(Metric::Mse).unwrap().source, "b");
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let reports = [("a", report(0.2)), ("b", report(0.2))];
        let tracker = BestModelTracker::from_reports(reports.iter().map(|(n, r)| (*n, r)));
        assert_eq!(tracker.best(Metric::Mse).unwrap().source, "a");
        assert_eq!(tracker.best(Metric::Mae).unwrap().source, "a");
    }

    #[test]
    fn test_higher_is_better_selects_maximum() {
        let mut tracker = BestModelTracker::new();
        tracker.observe(Metric::Auc, 0.7, "a");
        tracker.observe(Metric::Auc, 0.9, "b");
        tracker.observe(Metric::Auc, 0.8, "c");
        assert_eq!(tracker.best(Metric::Auc).unwrap().source, "b");
    }

    #[test]
    fn test_non_finite_never_wins() {
        let mut tracker = BestModelTracker::new();
        tracker.observe(Metric::Precision, f64::NAN, "a");
        assert!(tracker.best(Metric::Precision).is_none());
        tracker.observe(Metric::Precision, 0.4, "b");
        tracker.observe(Metric::Precision, f64::NAN, "c");
        tracker.observe(Metric::Ce, f64::INFINITY, "c");
        assert_eq!(tracker.best(Metric::Precision).unwrap().source, "b");
        assert!(tracker.best(Metric::Ce).is_none());
    }

    #[test]
    fn test_compare_skips_failed_datasets() {
        let mut data = HashMap::new();
        data.insert(
            "model_1.csv".to_string(),
            vec![RegressionSample::new(3.0, 2.0), RegressionSample::new(5.0, 5.0)],
        );
        data.insert("model_3.csv".to_string(), vec![RegressionSample::new(1.0, 1.0)]);
        let comparator = ModelComparator::new(MemoryLoader(data));

        let ids: Vec<String> = ["model_1.csv", "model_2.csv", "model_3.csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let comparison = comparator.compare(&ids, |s| Ok(RegressionReport::compute(s, 1e-10)));

        assert_eq!(comparison.evaluations.len(), 2);
        assert_eq!(comparison.skipped.len(), 1);
        assert_eq!(comparison.skipped[0].name, "model_2.csv");
        assert_eq!(comparison.metrics, vec![Metric::Mse, Metric::Mae, Metric::Mare]);
        assert_eq!(comparison.best.best(Metric::Mse).unwrap().source, "model_3.csv");
    }

    #[test]
    fn test_compare_any_fails_when_nothing_loads() {
        let comparator = ModelComparator::new(MemoryLoader::<RegressionSample>(HashMap::new()));
        let ids = vec!["gone.csv".to_string()];
        let result = comparator.compare_any(&ids, |s| Ok(RegressionReport::compute(s, 1e-10)));
        assert!(matches!(result, Err(EvalError::InvalidInput(_))));
    }

    #[test]
    fn test_compare_skips_datasets_that_fail_validation() {
        let mut data = HashMap::new();
        data.insert(
            "bad_label.csv".to_string(),
            vec![BinarySample::new(1, 0.9), BinarySample::new(2, 0.4)],
        );
        data.insert(
            "bad_probability.csv".to_string(),
            vec![BinarySample::new(1, 1.5), BinarySample::new(0, 0.1)],
        );
        data.insert(
            "good.csv".to_string(),
            vec![BinarySample::new(1, 0.8), BinarySample::new(0, 0.3)],
        );
        let comparator = ModelComparator::new(MemoryLoader(data));

        let ids: Vec<String> = ["bad_label.csv", "good.csv", "bad_probability.csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let comparison = comparator
            .compare_any(&ids, |s| BinaryReport::try_compute(s, 0.5, 100))
            .unwrap();

        assert_eq!(comparison.evaluations.len(), 1);
        assert_eq!(comparison.evaluations[0].name, "good.csv");
        let skipped: Vec<&str> = comparison.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["bad_label.csv", "bad_probability.csv"]);
        assert!(comparison.skipped[0].reason.contains("label 2"));
        assert_eq!(comparison.best.best(Metric::Auc).unwrap().source, "good.csv");
    }
}
