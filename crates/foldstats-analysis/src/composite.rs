//! Transforms feeding the composite feature importance plots.
//!
//! Starting from each algorithm's normalized importance restricted to the
//! selected features, four variants are derived:
//!
//! | variant                      | transform                            |
//! |------------------------------|--------------------------------------|
//! | [`CompositeVariant::Normalized`]                   | as is               |
//! | [`CompositeVariant::NormalizedFractionated`]       | [`fractionate`]     |
//! | [`CompositeVariant::NormalizedWeighted`]           | [`weight`]          |
//! | [`CompositeVariant::NormalizedFractionatedWeighted`] | [`fractionate`] then [`weight`] |
//!
//! Every transform is a pure function over one algorithm's vector. Columns are
//! always in original feature order.

use std::iter;

use crate::{algorithm::Algorithm, importance::FeatureImportanceSummary, selection::TopFeatureSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeVariant {
    Normalized,
    NormalizedFractionated,
    NormalizedWeighted,
    NormalizedFractionatedWeighted,
}

impl CompositeVariant {
    pub const ALL: [Self; 4] = [
        Self::Normalized,
        Self::NormalizedFractionated,
        Self::NormalizedWeighted,
        Self::NormalizedFractionatedWeighted,
    ];

    /// Suffix of the output file name.
    #[must_use]
    pub const fn file_tag(self) -> &'static str {
        match self {
            Self::Normalized => "Norm",
            Self::NormalizedFractionated => "Norm_Frac",
            Self::NormalizedWeighted => "Norm_Weight",
            Self::NormalizedFractionatedWeighted => "Norm_Frac_Weight",
        }
    }

    /// Value-axis label of the plot.
    #[must_use]
    pub const fn axis_label(self) -> &'static str {
        match self {
            Self::Normalized => "Normalized Feature Importance",
            Self::NormalizedFractionated => "Normalized and Fractioned Feature Importance",
            Self::NormalizedWeighted => "Normalized and Weighted Feature Importance",
            Self::NormalizedFractionatedWeighted => {
                "Normalized, Fractioned, and Weighted Feature Importance"
            }
        }
    }
}

/// Picks `indices` out of `values`.
#[must_use]
pub fn restrict(values: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| values[i]).collect()
}

/// Divides a vector by its sum so the entries sum to 1.
///
/// An all-zero vector stays all zeros.
#[must_use]
pub fn fractionate(values: &[f64]) -> Vec<f64> {
    let sum = values.iter().sum::<f64>();
    if sum == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / sum).collect()
}

/// Scales a vector by an algorithm's performance weight.
#[must_use]
pub fn weight(values: &[f64], weight: f64) -> Vec<f64> {
    values.iter().map(|v| v * weight).collect()
}

/// Bottom of every stacked bar segment.
///
/// Row `i` of the result is the element-wise sum of rows `0..i` of `rows`.
#[must_use]
pub fn stack_bases(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    let mut base = vec![0.0; width];
    let mut bases = Vec::with_capacity(rows.len());
    for row in rows {
        bases.push(base.clone());
        for (b, v) in base.iter_mut().zip(row) {
            *b += v;
        }
    }
    bases
}

/// One matrix per variant: rows are algorithms, columns are features.
#[derive(Debug, Clone)]
pub struct CompositeSeries {
    pub algorithms: Vec<Algorithm>,
    /// Original feature indices of the columns, ascending.
    pub features: Vec<usize>,
    pub normalized: Vec<Vec<f64>>,
    pub fractionated: Vec<Vec<f64>>,
    pub weighted: Vec<Vec<f64>>,
    pub fractionated_weighted: Vec<Vec<f64>>,
}

impl CompositeSeries {
    #[must_use]
    pub fn build(summary: &FeatureImportanceSummary, top: &TopFeatureSet) -> Self {
        let features = top.in_feature_order();
        let weights = summary.performance_weights();

        let normalized = summary
            .algorithms
            .iter()
            .map(|a| restrict(&a.normalized, &features))
            .collect::<Vec<_>>();
        let fractionated = normalized
            .iter()
            .map(|row| fractionate(row))
            .collect::<Vec<_>>();
        let weighted = iter::zip(&normalized, &weights)
            .map(|(row, &w)| weight(row, w))
            .collect();
        let fractionated_weighted = iter::zip(&fractionated, &weights)
            .map(|(row, &w)| weight(row, w))
            .collect();

        Self {
            algorithms: summary.algorithms.iter().map(|a| a.algorithm).collect(),
            features,
            normalized,
            fractionated,
            weighted,
            fractionated_weighted,
        }
    }

    #[must_use]
    pub fn rows(&self, variant: CompositeVariant) -> &[Vec<f64>] {
        match variant {
            CompositeVariant::Normalized => &self.normalized,
            CompositeVariant::NormalizedFractionated => &self.fractionated,
            CompositeVariant::NormalizedWeighted => &self.weighted,
            CompositeVariant::NormalizedFractionatedWeighted => &self.fractionated_weighted,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::importance::AlgorithmImportance;

    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_fractionate_unit_sum() {
        let fractions = fractionate(&[0.5, 1.0, 0.25, 0.25]);
        assert!((fractions.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
        assert_eq!(fractions, vec![0.25, 0.5, 0.125, 0.125]);
    }

    #[test]
    fn test_fractionate_all_zero() {
        assert_eq!(fractionate(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_weight() {
        assert_eq!(weight(&[0.5, 1.0], 0.0), vec![0.0, 0.0]);
        assert_eq!(weight(&[0.5, 1.0], 1.0), vec![0.5, 1.0]);
    }

    #[test]
    fn test_stack_bases() {
        let rows = vec![vec![1.0, 2.0], vec![0.5, 0.5], vec![3.0, 0.0]];
        let bases = stack_bases(&rows);
        assert_eq!(bases, vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![1.5, 2.5]]);
        assert!(stack_bases(&[]).is_empty());
    }

    #[test]
    fn test_build_variants() {
        let good = AlgorithmImportance::new(
            Algorithm::RandomForest,
            vec![vec![0.4, 0.0, 0.2, 0.4]],
            4,
            1.0,
        );
        let chance = AlgorithmImportance::new(
            Algorithm::Svm,
            vec![vec![0.0, 0.3, 0.6, 0.0]],
            4,
            0.4,
        );
        let summary = FeatureImportanceSummary::new(vec![good, chance]);
        let top = TopFeatureSet {
            ranked: vec![2, 0],
            was_ranked: true,
        };
        let series = CompositeSeries::build(&summary, &top);

        assert_eq!(series.features, vec![0, 2]);
        assert_eq!(series.normalized, vec![vec![1.0, 0.5], vec![0.0, 1.0]]);
        // weight 1.0 leaves the vector unchanged
        assert_eq!(series.weighted[0], series.normalized[0]);
        assert_eq!(series.weighted[1], vec![0.0, 0.0]);
        let fractions = &series.fractionated[0];
        assert!((fractions[0] - 2.0 / 3.0).abs() < TOLERANCE);
        assert!((fractions[1] - 1.0 / 3.0).abs() < TOLERANCE);
        assert_eq!(series.fractionated_weighted[1], vec![0.0, 0.0]);
        assert_eq!(
            series.rows(CompositeVariant::NormalizedFractionated),
            series.fractionated.as_slice()
        );
    }

    #[test]
    fn test_build_empty_selection() {
        let silent = AlgorithmImportance::new(Algorithm::Ann, vec![vec![0.0, -0.1]], 2, 0.9);
        let summary = FeatureImportanceSummary::new(vec![silent]);
        let top = TopFeatureSet {
            ranked: vec![],
            was_ranked: false,
        };
        let series = CompositeSeries::build(&summary, &top);

        assert!(series.features.is_empty());
        for variant in CompositeVariant::ALL {
            assert_eq!(series.rows(variant), [Vec::<f64>::new()]);
        }
    }
}
