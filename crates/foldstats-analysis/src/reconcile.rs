//! Mapping fold-local feature importance back to the original feature space.
//!
//! Upstream feature selection may keep a different subset of features in every
//! fold, and the kept features may be reordered. A fold's importance vector is
//! therefore only meaningful together with that fold's header. Reconciliation
//! places each score at the original index of its feature name and fills
//! features the fold dropped with `0.0`, so reconciled vectors are positionally
//! comparable across folds and algorithms.

use std::collections::HashMap;

use tracing::debug;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReconcileError {
    #[display(
        "fold {fold} has {scores} feature importance scores but {features} features in its header"
    )]
    LengthMismatch {
        fold: usize,
        scores: usize,
        features: usize,
    },
}

/// The original (pre-selection) feature list with a name → index lookup.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureIndex {
    /// Builds the index. If a name occurs twice, its first position wins.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { names, positions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Reconciles one fold's importance vector into the original feature space.
    ///
    /// `header` lists the fold-local feature names and `scores` holds one
    /// importance value per header entry. The result always has [`len`](Self::len)
    /// entries. Header names unknown to the original list are ignored.
    pub fn reconcile(
        &self,
        fold: usize,
        header: &[String],
        scores: &[f64],
    ) -> Result<Vec<f64>, ReconcileError> {
        if header.len() != scores.len() {
            return Err(ReconcileError::LengthMismatch {
                fold,
                scores: scores.len(),
                features: header.len(),
            });
        }

        let mut reconciled = vec![0.0; self.len()];
        // reverse so the first occurrence of a duplicated header name wins
        for (name, &score) in header.iter().zip(scores).rev() {
            match self.position(name) {
                Some(index) => reconciled[index] = score,
                None => debug!(fold, feature = %name, "fold feature not in original feature list"),
            }
        }
        Ok(reconciled)
    }
}
