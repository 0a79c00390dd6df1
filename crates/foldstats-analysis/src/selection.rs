//! Selection of the top features shown in the composite plots.

use std::iter;

use tracing::debug;

use crate::importance::FeatureImportanceSummary;

/// Chance level of the primary metric.
const CHANCE_LEVEL: f64 = 0.5;

/// Rescales a mean primary metric above chance level to `[0, 1]`.
///
/// Performance at or below chance gets weight `0`, perfect performance gets
/// weight `1`.
#[must_use]
pub fn performance_weight(mean_metric: f64) -> f64 {
    if mean_metric <= CHANCE_LEVEL {
        0.0
    } else {
        (mean_metric - CHANCE_LEVEL) / (1.0 - CHANCE_LEVEL)
    }
}

/// Features chosen for the composite plots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopFeatureSet {
    /// Feature indices in selection order: descending score when ranked,
    /// original feature order otherwise.
    pub ranked: Vec<usize>,
    /// Whether the candidate pool exceeded the limit and was ranked.
    pub was_ranked: bool,
}

impl TopFeatureSet {
    /// Selected feature indices in original feature order.
    #[must_use]
    pub fn in_feature_order(&self) -> Vec<usize> {
        let mut indices = self.ranked.clone();
        indices.sort_unstable();
        indices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Picks at most `top_results` features from the candidate pool `union`.
///
/// If the pool is small enough it is returned unchanged. Otherwise every
/// candidate is scored by the sum, over algorithms, of its normalized
/// importance times the algorithm's performance weight, and the highest
/// scores are kept. The sort is stable, so equal scores keep the order of
/// `union`.
#[must_use]
pub fn select_top_features(
    union: &[usize],
    normalized: &[&[f64]],
    weights: &[f64],
    top_results: usize,
) -> TopFeatureSet {
    if union.len() <= top_results {
        return TopFeatureSet {
            ranked: union.to_vec(),
            was_ranked: false,
        };
    }

    let mut scored = union
        .iter()
        .map(|&feature| {
            let score = iter::zip(normalized, weights)
                .map(|(values, weight)| values[feature] * weight)
                .sum::<f64>();
            (feature, score)
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    debug!(
        candidates = scored.len(),
        top_results, "ranked candidate features by weighted importance"
    );

    TopFeatureSet {
        ranked: scored
            .into_iter()
            .take(top_results)
            .map(|(feature, _)| feature)
            .collect(),
        was_ranked: true,
    }
}

/// Selects the top features of an aggregated summary.
#[must_use]
pub fn select_from_summary(summary: &FeatureImportanceSummary, top_results: usize) -> TopFeatureSet {
    select_top_features(
        &summary.non_zero_union,
        &summary.normalized(),
        &summary.performance_weights(),
        top_results,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_weight() {
        assert_eq!(performance_weight(0.4), 0.0);
        assert_eq!(performance_weight(0.5), 0.0);
        assert_eq!(performance_weight(1.0), 1.0);
        assert!((performance_weight(0.9) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_small_union_is_unchanged() {
        let union = [7, 2, 9, 4, 1];
        let normalized: [&[f64]; 1] = [&[0.0; 10]];
        let top = select_top_features(&union, &normalized, &[1.0], 10);
        assert_eq!(top.ranked, vec![7, 2, 9, 4, 1]);
        assert!(!top.was_ranked);
    }

    #[test]
    fn test_ranking_by_weighted_sum() {
        let union = [0, 1, 2, 3];
        let good: &[f64] = &[0.1, 1.0, 0.5, 0.2];
        let bad: &[f64] = &[1.0, 0.0, 0.0, 0.9];
        // the below-chance algorithm contributes nothing
        let top = select_top_features(&union, &[good, bad], &[1.0, 0.0], 2);
        assert_eq!(top.ranked, vec![1, 2]);
        assert!(top.was_ranked);
    }

    #[test]
    fn test_ties_keep_union_order() {
        let union = [0, 1, 2];
        let values: &[f64] = &[0.5, 0.5, 0.5];
        let top = select_top_features(&union, &[values], &[1.0], 2);
        assert_eq!(top.ranked, vec![0, 1]);
    }

    #[test]
    fn test_in_feature_order() {
        let top = TopFeatureSet {
            ranked: vec![5, 0, 3],
            was_ranked: true,
        };
        assert_eq!(top.in_feature_order(), vec![0, 3, 5]);
        assert_eq!(top.len(), 3);
    }
}
