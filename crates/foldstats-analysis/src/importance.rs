//! Feature importance aggregation across folds and algorithms.
//!
//! Per algorithm, the reconciled fold vectors are averaged element-wise and
//! then normalized to `[0, 1]`. Features whose average is positive for at
//! least one algorithm form the non-zero union, the candidate pool for the
//! composite plots.

use crate::{algorithm::Algorithm, selection};

/// Feature importance of one algorithm in the original feature space.
#[derive(Debug, Clone)]
pub struct AlgorithmImportance {
    pub algorithm: Algorithm,
    /// One reconciled vector per fold, in fold order.
    pub folds: Vec<Vec<f64>>,
    /// Element-wise mean of `folds`.
    pub average: Vec<f64>,
    /// `average` scaled to `[0, 1]`, see [`normalize`].
    pub normalized: Vec<f64>,
    /// Mean balanced accuracy across folds, the source of the performance
    /// weight.
    pub mean_balanced_accuracy: f64,
}

impl AlgorithmImportance {
    #[must_use]
    pub fn new(
        algorithm: Algorithm,
        folds: Vec<Vec<f64>>,
        num_features: usize,
        mean_balanced_accuracy: f64,
    ) -> Self {
        let average = average_folds(&folds, num_features);
        let normalized = normalize(&average);
        Self {
            algorithm,
            folds,
            average,
            normalized,
            mean_balanced_accuracy,
        }
    }

    #[must_use]
    pub fn performance_weight(&self) -> f64 {
        selection::performance_weight(self.mean_balanced_accuracy)
    }
}

/// Element-wise mean of reconciled fold vectors.
///
/// Returns all zeros when there are no folds.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn average_folds(folds: &[Vec<f64>], num_features: usize) -> Vec<f64> {
    let mut sums = vec![0.0; num_features];
    for fold in folds {
        for (sum, value) in sums.iter_mut().zip(fold) {
            *sum += value;
        }
    }
    if !folds.is_empty() {
        let n = folds.len() as f64;
        for sum in &mut sums {
            *sum /= n;
        }
    }
    sums
}

/// Scales a vector by its maximum.
///
/// Entries at or below zero are treated as uninformative and become `0.0`.
/// When no entry is positive the result is all zeros, otherwise the largest
/// entry becomes exactly `1.0`.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .max_by(f64::total_cmp);
    match max {
        Some(max) => values
            .iter()
            .map(|&v| if v > 0.0 { v / max } else { 0.0 })
            .collect(),
        None => vec![0.0; values.len()],
    }
}

/// Aggregated feature importance of all algorithms.
#[derive(Debug, Clone)]
pub struct FeatureImportanceSummary {
    /// Per-algorithm importance, in algorithm catalogue order.
    pub algorithms: Vec<AlgorithmImportance>,
    /// Indices of features with a positive average for at least one
    /// algorithm, in original feature order.
    pub non_zero_union: Vec<usize>,
}

impl FeatureImportanceSummary {
    #[must_use]
    pub fn new(algorithms: Vec<AlgorithmImportance>) -> Self {
        let num_features = algorithms.first().map_or(0, |a| a.average.len());
        let non_zero_union = (0..num_features)
            .filter(|&i| algorithms.iter().any(|a| a.average[i] > 0.0))
            .collect();
        Self {
            algorithms,
            non_zero_union,
        }
    }

    /// Performance weight of every algorithm, in the same order as `algorithms`.
    #[must_use]
    pub fn performance_weights(&self) -> Vec<f64> {
        self.algorithms
            .iter()
            .map(AlgorithmImportance::performance_weight)
            .collect()
    }

    #[must_use]
    pub fn normalized(&self) -> Vec<&[f64]> {
        self.algorithms
            .iter()
            .map(|a| a.normalized.as_slice())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_average_matches_fold_mean() {
        let folds = vec![
            vec![0.2, 0.0, 0.4],
            vec![0.1, 0.0, 0.5],
            vec![0.3, 0.2, 0.0],
        ];
        let average = average_folds(&folds, 3);
        let expected = [0.2, 0.2 / 3.0, 0.3];
        for (a, e) in average.iter().zip(expected) {
            assert!((a - e).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_average_without_folds() {
        assert_eq!(average_folds(&[], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_normalize_range_and_max() {
        let normalized = normalize(&[0.2, -0.1, 0.4, 0.0]);
        assert_eq!(normalized, vec![0.5, 0.0, 1.0, 0.0]);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&[0.3, 0.7, 0.1, -2.0]);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_non_positive() {
        assert_eq!(normalize(&[0.0, -0.5]), vec![0.0, 0.0]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_non_zero_union_in_feature_order() {
        let a = AlgorithmImportance::new(
            Algorithm::NaiveBayes,
            vec![vec![0.0, 0.0, 0.3, 0.0]],
            4,
            0.8,
        );
        let b = AlgorithmImportance::new(
            Algorithm::RandomForest,
            vec![vec![0.1, 0.0, 0.0, -0.2]],
            4,
            0.9,
        );
        let summary = FeatureImportanceSummary::new(vec![a, b]);
        assert_eq!(summary.non_zero_union, vec![0, 2]);
    }

    #[test]
    fn test_weights_follow_algorithms() {
        let a = AlgorithmImportance::new(Algorithm::NaiveBayes, vec![vec![1.0]], 1, 0.9);
        let b = AlgorithmImportance::new(Algorithm::DecisionTree, vec![vec![1.0]], 1, 0.4);
        let summary = FeatureImportanceSummary::new(vec![a, b]);
        let weights = summary.performance_weights();
        assert!((weights[0] - 0.8).abs() < TOLERANCE);
        assert_eq!(weights[1], 0.0);
    }
}
