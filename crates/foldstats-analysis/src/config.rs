//! Validated job configuration.
//!
//! Everything here is checked before any artifact is read, so a bad primary
//! metric name or algorithm mask never leaves a half-written results tree.

use crate::{algorithm::Algorithm, metric::Metric};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid algorithm selection mask '{mask}' (expected up to 7 characters of 0/1)")]
    InvalidAlgorithmMask { mask: String },
    #[display("algorithm selection mask selects no algorithm")]
    NoAlgorithmSelected,
    #[display("unrecognized primary metric '{name}'")]
    UnknownPrimaryMetric { name: String },
    #[display("number of CV partitions must be at least 1")]
    NoPartitions,
    #[display("number of top features must be at least 1")]
    NoTopResults,
    #[display("significance cutoff must lie strictly between 0 and 1, got {value}")]
    InvalidSignificanceCutoff { value: f64 },
}

/// Raw job settings as given on the command line.
#[derive(Debug, Clone)]
pub struct JobSettings<'a> {
    pub algorithm_mask: &'a str,
    pub cv_partitions: usize,
    pub class_label: &'a str,
    pub instance_label: Option<&'a str>,
    pub primary_metric: &'a str,
    pub top_results: usize,
    pub sig_cutoff: f64,
}

/// Configuration of one dataset's stats job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub algorithms: Vec<Algorithm>,
    pub cv_partitions: usize,
    pub class_label: String,
    pub instance_label: Option<String>,
    pub primary_metric: Metric,
    pub top_results: usize,
    pub sig_cutoff: f64,
}

impl JobConfig {
    pub fn from_settings(settings: &JobSettings<'_>) -> Result<Self, ConfigError> {
        let algorithms = Algorithm::decode_selection(settings.algorithm_mask)?;
        let primary_metric = Metric::from_primary_name(settings.primary_metric)?;
        if settings.cv_partitions == 0 {
            return Err(ConfigError::NoPartitions);
        }
        if settings.top_results == 0 {
            return Err(ConfigError::NoTopResults);
        }
        if !(settings.sig_cutoff > 0.0 && settings.sig_cutoff < 1.0) {
            return Err(ConfigError::InvalidSignificanceCutoff {
                value: settings.sig_cutoff,
            });
        }

        Ok(Self {
            algorithms,
            cv_partitions: settings.cv_partitions,
            class_label: settings.class_label.to_owned(),
            instance_label: settings.instance_label.map(str::to_owned),
            primary_metric,
            top_results: settings.top_results,
            sig_cutoff: settings.sig_cutoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> JobSettings<'static> {
        JobSettings {
            algorithm_mask: "1100000",
            cv_partitions: 3,
            class_label: "Class",
            instance_label: None,
            primary_metric: "balanced_accuracy",
            top_results: 20,
            sig_cutoff: 0.05,
        }
    }

    #[test]
    fn test_valid_settings() {
        let config = JobConfig::from_settings(&settings()).unwrap();
        assert_eq!(
            config.algorithms,
            vec![Algorithm::NaiveBayes, Algorithm::DecisionTree]
        );
        assert_eq!(config.primary_metric, Metric::BalancedAccuracy);
    }

    #[test]
    fn test_unknown_primary_metric() {
        let settings = JobSettings {
            primary_metric: "accuracy",
            ..settings()
        };
        assert!(matches!(
            JobConfig::from_settings(&settings),
            Err(ConfigError::UnknownPrimaryMetric { .. })
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        let zero_folds = JobSettings {
            cv_partitions: 0,
            ..settings()
        };
        assert!(matches!(
            JobConfig::from_settings(&zero_folds),
            Err(ConfigError::NoPartitions)
        ));
        let bad_cutoff = JobSettings {
            sig_cutoff: 1.5,
            ..settings()
        };
        assert!(matches!(
            JobConfig::from_settings(&bad_cutoff),
            Err(ConfigError::InvalidSignificanceCutoff { .. })
        ));
    }
}
