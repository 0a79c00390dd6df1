//! Per-fold performance metrics.

use std::fmt;

use crate::config::ConfigError;

/// The four metrics summarized for every fold, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    BalancedAccuracy,
    AggregateAveragePrecision,
    RocAuc,
    MatthewsCorrcoef,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.label(), f)
    }
}

impl Metric {
    pub const ALL: [Self; 4] = [
        Self::BalancedAccuracy,
        Self::AggregateAveragePrecision,
        Self::RocAuc,
        Self::MatthewsCorrcoef,
    ];

    /// Position of this metric in [`Metric::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label, also used as CSV column header and file-name suffix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BalancedAccuracy => "Balanced Accuracy",
            Self::AggregateAveragePrecision => "Aggregate Average Precision",
            Self::RocAuc => "ROC_AUC",
            Self::MatthewsCorrcoef => "Matthews Correlation Coefficient",
        }
    }

    /// Resolves a primary-metric name given in scikit-learn spelling.
    ///
    /// Only metrics that are stored as a scalar per fold can drive the
    /// performance weighting; anything else is a configuration mismatch.
    pub fn from_primary_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "balanced_accuracy" => Ok(Self::BalancedAccuracy),
            "roc_auc" => Ok(Self::RocAuc),
            "matthews_corrcoef" => Ok(Self::MatthewsCorrcoef),
            _ => Err(ConfigError::UnknownPrimaryMetric {
                name: name.to_owned(),
            }),
        }
    }
}

/// Aggregate average precision of a confusion matrix.
///
/// Rows are true classes and columns predicted classes. For every class `k`
/// the diagonal count is divided by the number of instances predicted as `k`
/// (a zero column contributes 0); the per-class values are averaged over all
/// classes.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn aggregate_average_precision(confusion: &[Vec<u64>]) -> f64 {
    let num_classes = confusion.len();
    if num_classes == 0 {
        return 0.0;
    }
    let total = (0..num_classes)
        .map(|k| {
            let predicted = confusion
                .iter()
                .map(|row| row.get(k).copied().unwrap_or(0))
                .sum::<u64>();
            let hits = confusion[k].get(k).copied().unwrap_or(0);
            if predicted == 0 {
                0.0
            } else {
                hits as f64 / predicted as f64
            }
        })
        .sum::<f64>();
    total / num_classes as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_metric_names() {
        assert_eq!(
            Metric::from_primary_name("balanced_accuracy").unwrap(),
            Metric::BalancedAccuracy
        );
        assert!(matches!(
            Metric::from_primary_name("f1"),
            Err(ConfigError::UnknownPrimaryMetric { .. })
        ));
    }

    #[test]
    fn test_aggregate_average_precision() {
        // predicted-as-0 column: 8 + 1 = 9, predicted-as-1 column: 2 + 9 = 11
        let confusion = vec![vec![8, 2], vec![1, 9]];
        let expected = (8.0 / 9.0 + 9.0 / 11.0) / 2.0;
        assert!((aggregate_average_precision(&confusion) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_average_precision_empty_column() {
        // class 1 is never predicted
        let confusion = vec![vec![5, 0], vec![5, 0]];
        assert!((aggregate_average_precision(&confusion) - 0.25).abs() < 1e-12);
        assert_eq!(aggregate_average_precision(&[]), 0.0);
    }
}
