//! End-to-end integration tests: artifact tree -> reconcile -> aggregate -> select -> composite.

use std::fs;
use std::path::Path;

use foldstats_analysis::{
    algorithm::Algorithm,
    collect::{AlgorithmResults, collect_algorithm_results},
    composite::{CompositeSeries, CompositeVariant},
    fold::FoldMetricBundle,
    importance::FeatureImportanceSummary,
    layout::DatasetLayout,
    reconcile::FeatureIndex,
    selection::select_from_summary,
};
use tempfile::TempDir;

const TOLERANCE: f64 = 1e-9;

/// Fold-local headers of the three test sets.
const FOLD_HEADERS: [&str; 3] = ["f1,Class,f3", "f1,f2,f3,Class", "Class,f1,f2"];

fn write_bundle(layout: &DatasetLayout, algorithm: Algorithm, fold: usize, ba: f64, fi: &[f64]) {
    let bundle = FoldMetricBundle {
        balanced_accuracy: ba,
        confusion_matrix: vec![vec![9, 1], vec![2, 8]],
        roc_auc: ba,
        mcc: 0.5,
        confusion_plot: None,
        feature_importance: fi.to_vec(),
    };
    let path = layout.bundle_path(algorithm, fold);
    fs::write(path, serde_json::to_string(&bundle).unwrap()).unwrap();
}

/// Writes the two-algorithm, three-fold tree over features `f1`, `f2`, `f3`.
fn write_tree(dir: &Path) -> DatasetLayout {
    write_tree_with_original(dir, "f1,f2,f3")
}

fn write_tree_with_original(dir: &Path, original_header: &str) -> DatasetLayout {
    let layout = DatasetLayout::new(dir.join("toy"), "Class", None);
    for sub in ["exploratory", "training", "CVDatasets"] {
        fs::create_dir_all(layout.root().join(sub)).unwrap();
    }
    fs::write(layout.original_headers_path(), format!("{original_header}\n")).unwrap();
    for (fold, header) in FOLD_HEADERS.iter().enumerate() {
        fs::write(layout.test_set_path(fold), format!("{header}\n")).unwrap();
    }

    let naive_bayes = [vec![0.2, 0.4], vec![0.1, 0.0, 0.5], vec![0.3, 0.2]];
    let random_forest = [vec![0.6, 0.1], vec![0.0, 0.9, 0.3], vec![0.2, 0.5]];
    for fold in 0..3 {
        write_bundle(&layout, Algorithm::NaiveBayes, fold, 0.9, &naive_bayes[fold]);
        write_bundle(&layout, Algorithm::RandomForest, fold, 0.4, &random_forest[fold]);
    }
    layout
}

fn collect_all(layout: &DatasetLayout) -> (FeatureIndex, Vec<AlgorithmResults>) {
    let features = FeatureIndex::new(layout.read_original_features().unwrap());
    let results = [Algorithm::NaiveBayes, Algorithm::RandomForest]
        .into_iter()
        .map(|algorithm| collect_algorithm_results(layout, algorithm, &features, 3).unwrap())
        .collect();
    (features, results)
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < TOLERANCE, "{actual:?} != {expected:?}");
    }
}

#[test]
fn reconciled_fold_vectors_and_average() {
    let dir = TempDir::new().unwrap();
    let layout = write_tree(dir.path());
    let (features, results) = collect_all(&layout);
    assert_eq!(features.names(), ["f1", "f2", "f3"]);

    let naive_bayes = &results[0];
    assert_eq!(
        naive_bayes.feature_importance,
        vec![
            vec![0.2, 0.0, 0.4],
            vec![0.1, 0.0, 0.5],
            vec![0.3, 0.2, 0.0],
        ]
    );
    for fold in &naive_bayes.feature_importance {
        assert_eq!(fold.len(), features.len());
    }

    let importance = naive_bayes.importance().unwrap();
    assert_close(&importance.average, &[0.2, 0.2 / 3.0, 0.3]);
    assert_eq!(naive_bayes.metrics.len(), 3);
}

#[test]
fn feature_dropped_from_every_fold_stays_zero() {
    let dir = TempDir::new().unwrap();
    let layout = write_tree_with_original(dir.path(), "f1,f2,f3,f9");
    let (features, results) = collect_all(&layout);
    assert_eq!(features.len(), 4);

    let importances = results
        .iter()
        .map(|r| r.importance().unwrap())
        .collect::<Vec<_>>();
    assert_close(&importances[0].average, &[0.2, 0.2 / 3.0, 0.3, 0.0]);
    for importance in &importances {
        assert!(importance.folds.iter().all(|fold| fold[3] == 0.0));
        assert_eq!(importance.average[3], 0.0);
        assert_eq!(importance.normalized[3], 0.0);
    }

    let summary = FeatureImportanceSummary::new(importances);
    assert_eq!(summary.non_zero_union, vec![0, 1, 2]);
}

#[test]
fn performance_weights_gate_composites() {
    let dir = TempDir::new().unwrap();
    let layout = write_tree(dir.path());
    let (_, results) = collect_all(&layout);

    let importances = results
        .iter()
        .map(|r| r.importance().unwrap())
        .collect::<Vec<_>>();
    let summary = FeatureImportanceSummary::new(importances);
    let weights = summary.performance_weights();
    assert!((weights[0] - 0.8).abs() < TOLERANCE);
    assert_eq!(weights[1], 0.0);
    assert_eq!(summary.non_zero_union, vec![0, 1, 2]);

    // the union exceeds the limit, so candidates are ranked: f3 then f1
    let top = select_from_summary(&summary, 2);
    assert!(top.was_ranked);
    assert_eq!(top.ranked, vec![2, 0]);

    let series = CompositeSeries::build(&summary, &top);
    assert_eq!(series.features, vec![0, 2]);
    assert_close(&series.normalized[0], &[2.0 / 3.0, 1.0]);
    for variant in [
        CompositeVariant::NormalizedWeighted,
        CompositeVariant::NormalizedFractionatedWeighted,
    ] {
        assert!(series.rows(variant)[1].iter().all(|&v| v == 0.0));
    }
    let fractions = &series.rows(CompositeVariant::NormalizedFractionated)[1];
    assert!((fractions.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
}

#[test]
fn small_union_is_not_ranked() {
    let dir = TempDir::new().unwrap();
    let layout = write_tree(dir.path());
    let (_, results) = collect_all(&layout);
    let importances = results
        .iter()
        .map(|r| r.importance().unwrap())
        .collect();
    let summary = FeatureImportanceSummary::new(importances);

    let top = select_from_summary(&summary, 10);
    assert!(!top.was_ranked);
    assert_eq!(top.ranked, summary.non_zero_union);
}

#[test]
fn missing_bundle_aborts_with_path() {
    let dir = TempDir::new().unwrap();
    let layout = write_tree(dir.path());
    fs::remove_file(layout.bundle_path(Algorithm::RandomForest, 2)).unwrap();
    let features = FeatureIndex::new(layout.read_original_features().unwrap());

    let err = collect_algorithm_results(&layout, Algorithm::RandomForest, &features, 3)
        .unwrap_err();
    assert!(err.is_missing_artifact());
    let source = std::error::Error::source(&err).unwrap().to_string();
    assert!(source.contains("RF_CV_2_metrics.json"), "{source}");
}
