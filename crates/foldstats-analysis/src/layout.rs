//! On-disk layout of one dataset's training artifacts and stats outputs.
//!
//! ```text
//! <experiment>/
//! ├─ jobsCompleted/job_stats_<name>.txt        completion marker (written)
//! └─ <name>/
//!     ├─ exploratory/OriginalHeaders.csv        original feature order
//!     ├─ CVDatasets/<name>_CV_<k>_Test.csv      fold-local feature order (header only)
//!     ├─ training/<ABBREV>_CV_<k>_metrics.json  metrics bundle per (algorithm, fold)
//!     ├─ training/results/                      stats outputs (written)
//!     ├─ runtime/runtime_<phase>.txt            elapsed seconds per phase
//!     └─ runtimes.csv                           combined runtime report (written)
//! ```

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    algorithm::Algorithm,
    fold::{FoldHeader, FoldMetricBundle, FoldResultReader},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FoldReadError {
    #[display("missing artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },
    #[display("failed to read {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse metrics bundle {}", path.display())]
    Bundle {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("failed to read CSV header of {}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("missing artifact: column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Paths of one dataset directory.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
    name: String,
    class_label: String,
    instance_label: Option<String>,
}

impl DatasetLayout {
    /// Creates the layout for the dataset directory `root`.
    ///
    /// The dataset name is the last component of `root`. `class_label` and
    /// `instance_label` name the test-set columns that are not features.
    pub fn new<P>(root: P, class_label: &str, instance_label: Option<&str>) -> Self
    where
        P: Into<PathBuf>,
    {
        let root = root.into();
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            root,
            name,
            class_label: class_label.to_owned(),
            instance_label: instance_label.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn original_headers_path(&self) -> PathBuf {
        self.root.join("exploratory").join("OriginalHeaders.csv")
    }

    #[must_use]
    pub fn bundle_path(&self, algorithm: Algorithm, fold: usize) -> PathBuf {
        self.root
            .join("training")
            .join(format!("{}_CV_{fold}_metrics.json", algorithm.abbrev()))
    }

    #[must_use]
    pub fn test_set_path(&self, fold: usize) -> PathBuf {
        self.root
            .join("CVDatasets")
            .join(format!("{}_CV_{fold}_Test.csv", self.name))
    }

    #[must_use]
    pub fn results_dir(&self) -> PathBuf {
        self.root.join("training").join("results")
    }

    #[must_use]
    pub fn feature_importance_dir(&self) -> PathBuf {
        self.results_dir().join("FI")
    }

    #[must_use]
    pub fn significance_dir(&self) -> PathBuf {
        self.results_dir().join("KWMW")
    }

    #[must_use]
    pub fn metric_boxplot_dir(&self) -> PathBuf {
        self.results_dir().join("performanceBoxplots")
    }

    #[must_use]
    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join("runtime")
    }

    #[must_use]
    pub fn runtime_report_path(&self) -> PathBuf {
        self.root.join("runtimes.csv")
    }

    #[must_use]
    pub fn completion_marker_path(&self) -> PathBuf {
        let experiment = self.root.parent().unwrap_or_else(|| Path::new("."));
        experiment
            .join("jobsCompleted")
            .join(format!("job_stats_{}.txt", self.name))
    }

    /// Reads the original feature list (the canonical index space).
    pub fn read_original_features(&self) -> Result<Vec<String>, FoldReadError> {
        read_header_row(&self.original_headers_path())
    }

    fn strip_label_columns(
        &self,
        path: &Path,
        mut columns: Vec<String>,
    ) -> Result<Vec<String>, FoldReadError> {
        let labels = self
            .instance_label
            .iter()
            .chain(std::iter::once(&self.class_label));
        for label in labels {
            let pos = columns.iter().position(|c| c == label).ok_or_else(|| {
                FoldReadError::MissingColumn {
                    path: path.to_owned(),
                    column: label.clone(),
                }
            })?;
            columns.remove(pos);
        }
        Ok(columns)
    }
}

impl FoldResultReader for DatasetLayout {
    fn read_bundle(
        &self,
        algorithm: Algorithm,
        fold: usize,
    ) -> Result<FoldMetricBundle, FoldReadError> {
        let path = self.bundle_path(algorithm, fold);
        debug!(path = %path.display(), "reading metrics bundle");
        let file = open_artifact(&path)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| FoldReadError::Bundle { path, source })
    }

    fn read_header(&self, fold: usize) -> Result<FoldHeader, FoldReadError> {
        let path = self.test_set_path(fold);
        debug!(path = %path.display(), "reading test set header");
        let columns = read_header_row(&path)?;
        let features = self.strip_label_columns(&path, columns)?;
        Ok(FoldHeader { features })
    }
}

fn open_artifact(path: &Path) -> Result<File, FoldReadError> {
    File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FoldReadError::MissingArtifact {
                path: path.to_owned(),
            }
        } else {
            FoldReadError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })
}

fn read_header_row(path: &Path) -> Result<Vec<String>, FoldReadError> {
    let file = open_artifact(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let headers = reader.headers().map_err(|source| FoldReadError::Csv {
        path: path.to_owned(),
        source,
    })?;
    Ok(headers.iter().map(str::to_owned).collect())
}
