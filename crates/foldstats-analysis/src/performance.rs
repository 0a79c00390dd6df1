//! Per-algorithm metric samples across folds.

use foldstats_stats::descriptive::DescriptiveStats;

use crate::{algorithm::Algorithm, fold::FoldMetricBundle, metric::Metric};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AggregateError {
    #[display("{algorithm}: no folds recorded")]
    NoFolds { algorithm: Algorithm },
    #[display("{algorithm}: standard deviation needs at least two folds, got {samples}")]
    InsufficientSamples { algorithm: Algorithm, samples: usize },
}

/// Metric samples of one algorithm, one entry per fold in fold order.
#[derive(Debug, Clone)]
pub struct AlgorithmMetricSeries {
    pub algorithm: Algorithm,
    samples: [Vec<f64>; Metric::ALL.len()],
}

impl AlgorithmMetricSeries {
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            samples: Default::default(),
        }
    }

    /// Appends the metrics of the next fold.
    pub fn push(&mut self, bundle: &FoldMetricBundle) {
        let values = [
            bundle.balanced_accuracy,
            bundle.aggregate_average_precision(),
            bundle.roc_auc,
            bundle.mcc,
        ];
        for (samples, value) in self.samples.iter_mut().zip(values) {
            samples.push(value);
        }
    }

    /// Number of folds recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn samples(&self, metric: Metric) -> &[f64] {
        &self.samples[metric.index()]
    }

    /// Mean of `metric` across folds.
    pub fn mean(&self, metric: Metric) -> Result<f64, AggregateError> {
        self.describe(metric).map(|stats| stats.mean)
    }

    /// Sample standard deviation of `metric` across folds.
    pub fn std_dev(&self, metric: Metric) -> Result<f64, AggregateError> {
        self.describe(metric)?
            .sample_std_dev
            .ok_or(AggregateError::InsufficientSamples {
                algorithm: self.algorithm,
                samples: self.len(),
            })
    }

    /// Means of all metrics, in [`Metric::ALL`] order.
    pub fn means(&self) -> Result<Vec<f64>, AggregateError> {
        Metric::ALL.iter().map(|&m| self.mean(m)).collect()
    }

    /// Sample standard deviations of all metrics, in [`Metric::ALL`] order.
    pub fn std_devs(&self) -> Result<Vec<f64>, AggregateError> {
        Metric::ALL.iter().map(|&m| self.std_dev(m)).collect()
    }

    fn describe(&self, metric: Metric) -> Result<DescriptiveStats, AggregateError> {
        DescriptiveStats::new(self.samples(metric).iter().copied()).ok_or(
            AggregateError::NoFolds {
                algorithm: self.algorithm,
            },
        )
    }
}
