//! Per-fold training artifacts.
//!
//! A training run leaves, for every (algorithm, fold) pair, a metrics bundle
//! and a test set whose header gives the fold-local feature order. The
//! [`FoldResultReader`] trait is the seam between the aggregation core and
//! wherever those artifacts live; [`DatasetLayout`](crate::layout::DatasetLayout)
//! is the on-disk implementation.

use serde::{Deserialize, Serialize};

use crate::{algorithm::Algorithm, layout::FoldReadError, metric};

/// Metrics bundle stored by the training stage for one (algorithm, fold).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoldMetricBundle {
    pub balanced_accuracy: f64,
    /// Square matrix, rows are true classes and columns predicted classes.
    pub confusion_matrix: Vec<Vec<u64>>,
    pub roc_auc: f64,
    pub mcc: f64,
    /// Renderable produced by the training stage. Kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confusion_plot: Option<serde_json::Value>,
    /// One score per fold-local feature, in fold-local order.
    pub feature_importance: Vec<f64>,
}

impl FoldMetricBundle {
    #[must_use]
    pub fn aggregate_average_precision(&self) -> f64 {
        metric::aggregate_average_precision(&self.confusion_matrix)
    }
}

/// Feature names of a fold's test set, in fold-local order.
///
/// The instance-ID and class-label columns are already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldHeader {
    pub features: Vec<String>,
}

/// Bundle and header for one (algorithm, fold).
#[derive(Debug, Clone)]
pub struct FoldResult {
    pub bundle: FoldMetricBundle,
    pub header: FoldHeader,
}

/// Read access to the artifacts of a finished training run.
pub trait FoldResultReader {
    fn read_bundle(
        &self,
        algorithm: Algorithm,
        fold: usize,
    ) -> Result<FoldMetricBundle, FoldReadError>;

    fn read_header(&self, fold: usize) -> Result<FoldHeader, FoldReadError>;

    fn read_fold(&self, algorithm: Algorithm, fold: usize) -> Result<FoldResult, FoldReadError> {
        Ok(FoldResult {
            bundle: self.read_bundle(algorithm, fold)?,
            header: self.read_header(fold)?,
        })
    }
}
