//! Collection of one algorithm's fold artifacts.

use tracing::{debug, instrument};

use crate::{
    algorithm::Algorithm,
    fold::FoldResultReader,
    importance::AlgorithmImportance,
    layout::FoldReadError,
    metric::Metric,
    performance::{AggregateError, AlgorithmMetricSeries},
    reconcile::{FeatureIndex, ReconcileError},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CollectError {
    #[display("{algorithm}: failed to read fold {fold}")]
    Read {
        algorithm: Algorithm,
        fold: usize,
        source: FoldReadError,
    },
    #[display("{algorithm}: failed to reconcile feature importance")]
    Reconcile {
        algorithm: Algorithm,
        source: ReconcileError,
    },
}

impl CollectError {
    /// Whether the failure is a required artifact that does not exist.
    #[must_use]
    pub fn is_missing_artifact(&self) -> bool {
        matches!(
            self,
            Self::Read {
                source: FoldReadError::MissingArtifact { .. } | FoldReadError::MissingColumn { .. },
                ..
            }
        )
    }
}

/// Everything one algorithm contributed across all folds, in fold order.
#[derive(Debug, Clone)]
pub struct AlgorithmResults {
    pub algorithm: Algorithm,
    pub metrics: AlgorithmMetricSeries,
    /// Reconciled feature importance, one vector per fold.
    pub feature_importance: Vec<Vec<f64>>,
    pub confusion_matrices: Vec<Vec<Vec<u64>>>,
}

impl AlgorithmResults {
    /// Feature importance summary weighted by mean balanced accuracy.
    ///
    /// The weight rescales performance above the 0.5 chance level, so it is
    /// always taken from balanced accuracy whatever the configured primary
    /// metric is.
    pub fn importance(&self) -> Result<AlgorithmImportance, AggregateError> {
        let mean = self.metrics.mean(Metric::BalancedAccuracy)?;
        let num_features = self.feature_importance.first().map_or(0, Vec::len);
        Ok(AlgorithmImportance::new(
            self.algorithm,
            self.feature_importance.clone(),
            num_features,
            mean,
        ))
    }
}

/// Reads folds `0..cv_partitions` of `algorithm` and reconciles their
/// feature importance against `features`.
///
/// Any missing or unreadable fold aborts the collection.
#[instrument(skip_all, fields(%algorithm, cv_partitions))]
pub fn collect_algorithm_results<R>(
    reader: &R,
    algorithm: Algorithm,
    features: &FeatureIndex,
    cv_partitions: usize,
) -> Result<AlgorithmResults, CollectError>
where
    R: FoldResultReader + ?Sized,
{
    let mut metrics = AlgorithmMetricSeries::new(algorithm);
    let mut feature_importance = Vec::with_capacity(cv_partitions);
    let mut confusion_matrices = Vec::with_capacity(cv_partitions);

    for fold in 0..cv_partitions {
        let result = reader
            .read_fold(algorithm, fold)
            .map_err(|source| CollectError::Read {
                algorithm,
                fold,
                source,
            })?;
        let reconciled = features
            .reconcile(
                fold,
                &result.header.features,
                &result.bundle.feature_importance,
            )
            .map_err(|source| CollectError::Reconcile { algorithm, source })?;
        debug!(
            fold,
            kept = result.header.features.len(),
            original = features.len(),
            "reconciled fold feature importance"
        );

        metrics.push(&result.bundle);
        feature_importance.push(reconciled);
        confusion_matrices.push(result.bundle.confusion_matrix);
    }

    Ok(AlgorithmResults {
        algorithm,
        metrics,
        feature_importance,
        confusion_matrices,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::fold::{FoldHeader, FoldMetricBundle};

    use super::*;

    #[derive(Default)]
    struct MemoryReader {
        headers: HashMap<usize, Vec<String>>,
        bundles: HashMap<(Algorithm, usize), FoldMetricBundle>,
    }

    impl FoldResultReader for MemoryReader {
        fn read_bundle(
            &self,
            algorithm: Algorithm,
            fold: usize,
        ) -> Result<FoldMetricBundle, FoldReadError> {
            self.bundles
                .get(&(algorithm, fold))
                .cloned()
                .ok_or_else(|| FoldReadError::MissingArtifact {
                    path: format!("{}_CV_{fold}", algorithm.abbrev()).into(),
                })
        }

        fn read_header(&self, fold: usize) -> Result<FoldHeader, FoldReadError> {
            let features = self.headers.get(&fold).cloned().unwrap_or_default();
            Ok(FoldHeader { features })
        }
    }

    fn bundle(balanced_accuracy: f64, feature_importance: Vec<f64>) -> FoldMetricBundle {
        FoldMetricBundle {
            balanced_accuracy,
            confusion_matrix: vec![vec![4, 1], vec![1, 4]],
            roc_auc: 0.8,
            mcc: 0.6,
            confusion_plot: None,
            feature_importance,
        }
    }

    fn index() -> FeatureIndex {
        FeatureIndex::new(vec!["a".to_owned(), "b".to_owned()])
    }

    #[test]
    fn test_collects_in_fold_order() {
        let mut reader = MemoryReader::default();
        reader.headers.insert(0, vec!["b".to_owned()]);
        reader
            .headers
            .insert(1, vec!["a".to_owned(), "b".to_owned()]);
        reader
            .bundles
            .insert((Algorithm::DecisionTree, 0), bundle(0.7, vec![0.5]));
        reader
            .bundles
            .insert((Algorithm::DecisionTree, 1), bundle(0.9, vec![0.1, 0.3]));

        let results =
            collect_algorithm_results(&reader, Algorithm::DecisionTree, &index(), 2).unwrap();
        assert_eq!(results.feature_importance, vec![vec![0.0, 0.5], vec![0.1, 0.3]]);
        assert_eq!(
            results.metrics.samples(Metric::BalancedAccuracy),
            &[0.7, 0.9]
        );
        assert_eq!(results.confusion_matrices.len(), 2);

        let importance = results.importance().unwrap();
        assert!((importance.mean_balanced_accuracy - 0.8).abs() < 1e-12);
        assert!((importance.average[0] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_weight_follows_balanced_accuracy() {
        let mut reader = MemoryReader::default();
        reader.headers.insert(0, vec!["a".to_owned(), "b".to_owned()]);
        let mut fold = bundle(0.9, vec![0.4, 0.2]);
        fold.mcc = 0.45;
        reader.bundles.insert((Algorithm::Svm, 0), fold);

        let results = collect_algorithm_results(&reader, Algorithm::Svm, &index(), 1).unwrap();
        // an MCC of 0.45 would fall under the chance level and zero the weight
        assert_eq!(crate::selection::performance_weight(0.45), 0.0);
        let importance = results.importance().unwrap();
        assert!((importance.mean_balanced_accuracy - 0.9).abs() < 1e-12);
        assert!((importance.performance_weight() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_missing_fold_is_fatal() {
        let mut reader = MemoryReader::default();
        reader.headers.insert(0, vec!["a".to_owned()]);
        reader
            .bundles
            .insert((Algorithm::Xgb, 0), bundle(0.7, vec![0.5]));

        let err = collect_algorithm_results(&reader, Algorithm::Xgb, &index(), 2).unwrap_err();
        assert!(err.is_missing_artifact());
        assert!(matches!(err, CollectError::Read { fold: 1, .. }));
    }

    #[test]
    fn test_length_mismatch_is_not_missing_artifact() {
        let mut reader = MemoryReader::default();
        reader.headers.insert(0, vec!["a".to_owned()]);
        reader
            .bundles
            .insert((Algorithm::Ann, 0), bundle(0.7, vec![0.5, 0.1]));

        let err = collect_algorithm_results(&reader, Algorithm::Ann, &index(), 1).unwrap_err();
        assert!(!err.is_missing_artifact());
        assert!(matches!(err, CollectError::Reconcile { .. }));
    }
}
