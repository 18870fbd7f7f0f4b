//! Property-based tests for the metric engine using proptest.

use proptest::prelude::*;

use modelgrade_core::metrics::{binary, multiclass, regression};
use modelgrade_core::{
    BestModelTracker, BinaryReport, BinarySample, Metric, MulticlassSample, RegressionSample,
};

fn binary_samples() -> impl Strategy<Value = Vec<BinarySample>> {
    prop::collection::vec((0u8..=1, 0.0f64..=1.0), 1..200)
        .prop_map(|rows| rows.into_iter().map(|(a, p)| BinarySample::new(a, p)).collect())
}

fn multiclass_samples(k: usize) -> impl Strategy<Value = Vec<MulticlassSample>> {
    prop::collection::vec(
        (0..k, prop::collection::vec(0.001f64..1.0, k)),
        1..100,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(actual, raw)| {
                let sum: f64 = raw.iter().sum();
                MulticlassSample::new(actual, raw.iter().map(|p| p / sum).collect())
            })
            .collect()
    })
}

// --- Confusion matrix properties ---

proptest! {
    #[test]
    fn binary_matrix_sums_to_sample_count(
        samples in binary_samples(),
        threshold in 0.0f64..=1.0,
    ) {
        let cm = binary::confusion_matrix(&samples, threshold);
        prop_assert_eq!(cm.total(), samples.len());
    }

    #[test]
    fn multiclass_matrix_sums_to_sample_count(samples in multiclass_samples(5)) {
        let cm = multiclass::confusion_matrix(&samples, 5);
        prop_assert_eq!(cm.total(), samples.len());
        prop_assert_eq!(cm.n_classes(), 5);
    }

    #[test]
    fn multiclass_cross_entropy_is_finite_and_non_negative(samples in multiclass_samples(4)) {
        let ce = multiclass::cross_entropy(&samples);
        prop_assert!(ce.is_finite());
        prop_assert!(ce >= 0.0);
    }
}

// --- Ratio range properties ---

proptest! {
    #[test]
    fn ratios_stay_in_unit_interval(
        samples in binary_samples(),
        threshold in 0.0f64..=1.0,
    ) {
        let report = BinaryReport::compute(&samples, threshold, binary::DEFAULT_AUC_STEPS);
        prop_assert!((0.0..=1.0).contains(&report.accuracy));
        if !report.precision.is_nan() {
            prop_assert!((0.0..=1.0).contains(&report.precision));
        }
        if !report.recall.is_nan() {
            prop_assert!((0.0..=1.0).contains(&report.recall));
        }
    }

    #[test]
    fn auc_in_unit_interval_when_both_classes_present(samples in binary_samples()) {
        let positives = samples.iter().filter(|s| s.actual == 1).count();
        prop_assume!(positives > 0 && positives < samples.len());
        let auc = binary::auc(&samples, binary::DEFAULT_AUC_STEPS);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&auc));
    }

    #[test]
    fn perfect_predictions_have_unit_auc(labels in prop::collection::vec(0u8..=1, 2..100)) {
        prop_assume!(labels.contains(&0) && labels.contains(&1));
        let samples: Vec<_> = labels
            .iter()
            .map(|&a| BinarySample::new(a, f64::from(a)))
            .collect();
        let auc = binary::auc(&samples, binary::DEFAULT_AUC_STEPS);
        prop_assert!((auc - 1.0).abs() < 1e-12);
    }
}

// --- Determinism ---

proptest! {
    #[test]
    fn binary_report_is_deterministic(samples in binary_samples()) {
        let first = BinaryReport::compute(&samples, 0.5, 100);
        let second = BinaryReport::compute(&samples, 0.5, 100);
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn regression_metrics_are_order_independent(
        pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..50)
    ) {
        let samples: Vec<_> = pairs.iter().map(|&(a, p)| RegressionSample::new(a, p)).collect();
        let mut reversed = samples.clone();
        reversed.reverse();
        prop_assert!((regression::mse(&samples) - regression::mse(&reversed)).abs() < 1e-6);
        prop_assert!((regression::mae(&samples) - regression::mae(&reversed)).abs() < 1e-9);
        prop_assert!(regression::mse(&samples) >= 0.0);
    }
}

// --- Argmax and tracker ---

proptest! {
    #[test]
    fn argmax_returns_first_maximum(values in prop::collection::vec(0.0f64..1.0, 1..10)) {
        let idx = multiclass::argmax(&values);
        prop_assert!(values.iter().all(|&v| v <= values[idx]));
        prop_assert!(values[..idx].iter().all(|&v| v < values[idx]));
    }

    #[test]
    fn tracker_picks_first_minimum(scores in prop::collection::vec(0.0f64..10.0, 1..20)) {
        let mut tracker = BestModelTracker::new();
        for (i, score) in scores.iter().enumerate() {
            tracker.observe(Metric::Mse, *score, &format!("model_{i}.csv"));
        }
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let first = scores.iter().position(|&s| s == min).unwrap();
        let best = tracker.best(Metric::Mse).unwrap();
        prop_assert_eq!(best.value, min);
        prop_assert_eq!(&best.source, &format!("model_{first}.csv"));
    }
}
