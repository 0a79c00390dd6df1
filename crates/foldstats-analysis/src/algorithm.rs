//! Catalogue of the classification algorithms a training run can produce.
//!
//! The catalogue order is fixed and is the order used everywhere results are
//! listed: CSV rows, stacked bar layers and pairwise comparison tables.

use std::fmt;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    NaiveBayes,
    DecisionTree,
    RandomForest,
    Xgb,
    Svm,
    Ann,
    KNeighbors,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

impl Algorithm {
    /// All algorithms in catalogue order (bit 0 first).
    pub const ALL: [Self; 7] = [
        Self::NaiveBayes,
        Self::DecisionTree,
        Self::RandomForest,
        Self::Xgb,
        Self::Svm,
        Self::Ann,
        Self::KNeighbors,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NaiveBayes => "Naive Bayes",
            Self::DecisionTree => "Decision Tree",
            Self::RandomForest => "Random Forest",
            Self::Xgb => "XGB",
            Self::Svm => "SVM",
            Self::Ann => "ANN",
            Self::KNeighbors => "K Neighbors",
        }
    }

    /// Short name used in artifact file names.
    #[must_use]
    pub const fn abbrev(self) -> &'static str {
        match self {
            Self::NaiveBayes => "NB",
            Self::DecisionTree => "DT",
            Self::RandomForest => "RF",
            Self::Xgb => "XGB",
            Self::Svm => "SVM",
            Self::Ann => "ANN",
            Self::KNeighbors => "KN",
        }
    }

    /// Label used for this algorithm in the combined runtime report.
    #[must_use]
    pub const fn runtime_label(self) -> &'static str {
        match self {
            Self::Svm => "Support Vector Machine",
            Self::Ann => "Artificial Neural Network",
            Self::KNeighbors => "K Nearest Neighbors",
            _ => self.name(),
        }
    }

    /// Plot colour as an RGB triple.
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            Self::NaiveBayes => (128, 128, 128),
            Self::DecisionTree => (255, 255, 0),
            Self::RandomForest => (255, 165, 0),
            Self::Xgb => (128, 0, 128),
            Self::Svm => (0, 0, 255),
            Self::Ann => (255, 0, 0),
            Self::KNeighbors => (46, 139, 87),
        }
    }

    /// Decodes an algorithm-selection bitmask such as `"1110000"`.
    ///
    /// Position `i` of the mask selects catalogue entry `i`. A mask may be
    /// shorter than the catalogue; missing positions count as `0`.
    pub fn decode_selection(mask: &str) -> Result<Vec<Self>, ConfigError> {
        if mask.chars().count() > Self::ALL.len() {
            return Err(ConfigError::InvalidAlgorithmMask {
                mask: mask.to_owned(),
            });
        }
        let mut selected = vec![];
        for (algorithm, bit) in Self::ALL.into_iter().zip(mask.chars()) {
            match bit {
                '1' => selected.push(algorithm),
                '0' => {}
                _ => {
                    return Err(ConfigError::InvalidAlgorithmMask {
                        mask: mask.to_owned(),
                    });
                }
            }
        }
        if selected.is_empty() {
            return Err(ConfigError::NoAlgorithmSelected);
        }
        Ok(selected)
    }

    /// Looks up an algorithm by abbreviation or full name.
    #[must_use]
    pub fn from_reference(reference: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.abbrev() == reference || a.name() == reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_selection() {
        let algorithms = Algorithm::decode_selection("1010001").unwrap();
        assert_eq!(
            algorithms,
            vec![
                Algorithm::NaiveBayes,
                Algorithm::RandomForest,
                Algorithm::KNeighbors
            ]
        );
    }

    #[test]
    fn test_decode_short_mask() {
        let algorithms = Algorithm::decode_selection("01").unwrap();
        assert_eq!(algorithms, vec![Algorithm::DecisionTree]);
    }

    #[test]
    fn test_decode_rejects_bad_masks() {
        assert!(matches!(
            Algorithm::decode_selection("0000000"),
            Err(ConfigError::NoAlgorithmSelected)
        ));
        assert!(matches!(
            Algorithm::decode_selection("10x0000"),
            Err(ConfigError::InvalidAlgorithmMask { .. })
        ));
        assert!(matches!(
            Algorithm::decode_selection("11111111"),
            Err(ConfigError::InvalidAlgorithmMask { .. })
        ));
    }

    #[test]
    fn test_from_reference() {
        assert_eq!(Algorithm::from_reference("RF"), Some(Algorithm::RandomForest));
        assert_eq!(
            Algorithm::from_reference("Naive Bayes"),
            Some(Algorithm::NaiveBayes)
        );
        assert_eq!(Algorithm::from_reference("exploratory"), None);
    }
}
