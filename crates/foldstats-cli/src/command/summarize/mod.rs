//! Stats summary command
//!
//! Summarizes the cross-validation results of one dataset: per-algorithm
//! performance tables, significance tests between algorithms, and the
//! feature importance plots, followed by the runtime report and the
//! completion marker.

mod importance;
mod performance;

use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Args;
use foldstats_analysis::{
    config::{JobConfig, JobSettings},
    layout::DatasetLayout,
    reconcile::FeatureIndex,
};
use tracing::info;

use crate::{output, runtime};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    /// Dataset directory produced by the training pipeline
    pub dataset_dir: PathBuf,

    /// Algorithm selection mask, one 0/1 character per algorithm
    /// (Naive Bayes, Decision Tree, Random Forest, XGB, SVM, ANN, K Neighbors)
    #[arg(long, default_value = "1111111")]
    pub algorithms: String,

    /// Number of cross-validation partitions
    #[arg(long, default_value_t = 3)]
    pub cv_partitions: usize,

    /// Name of the class label column in the test sets
    #[arg(long, default_value = "Class")]
    pub class_label: String,

    /// Name of the instance ID column in the test sets, if any
    #[arg(long)]
    pub instance_label: Option<String>,

    /// Primary evaluation metric of the training run
    #[arg(long, default_value = "balanced_accuracy")]
    pub primary_metric: String,

    /// Maximum number of features shown in the composite plots
    #[arg(long, default_value_t = 20)]
    pub top_results: usize,

    /// P-value below which a difference is significant
    #[arg(long, default_value_t = 0.05)]
    pub sig_cutoff: f64,

    /// Also plot per-algorithm feature importance boxplots
    #[arg(long)]
    pub plot_fi_box: bool,

    /// Also plot per-metric algorithm comparison boxplots
    #[arg(long)]
    pub plot_metric_boxplots: bool,
}

impl SummarizeArg {
    fn settings(&self) -> JobSettings<'_> {
        JobSettings {
            algorithm_mask: &self.algorithms,
            cv_partitions: self.cv_partitions,
            class_label: &self.class_label,
            instance_label: self.instance_label.as_deref(),
            primary_metric: &self.primary_metric,
            top_results: self.top_results,
            sig_cutoff: self.sig_cutoff,
        }
    }
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = JobConfig::from_settings(&arg.settings()).context("Invalid job configuration")?;
    let layout = DatasetLayout::new(
        &arg.dataset_dir,
        &config.class_label,
        config.instance_label.as_deref(),
    );
    info!(
        dataset = layout.name(),
        algorithms = config.algorithms.len(),
        cv_partitions = config.cv_partitions,
        primary_metric = %config.primary_metric,
        "starting stats summary"
    );

    let original_features = layout.read_original_features().with_context(|| {
        format!(
            "Failed to read original feature list of dataset {}",
            layout.name()
        )
    })?;
    let features = FeatureIndex::new(original_features);
    info!(features = features.len(), "loaded original feature list");

    output::create_dir(&layout.results_dir())?;
    output::create_dir(&layout.feature_importance_dir())?;

    let results = performance::collect_and_export(&layout, &config, &features)?;
    performance::export_summaries(&layout, &results)?;
    if arg.plot_metric_boxplots {
        performance::plot_metric_boxplots(&layout, &results)?;
    }
    performance::export_significance(&layout, &config, &results)?;

    importance::export_feature_importance(&layout, &config, &features, &results, arg.plot_fi_box)?;

    runtime::write_runtime(&layout.runtime_dir(), runtime::STATS_REFERENCE, start.elapsed())?;
    runtime::write_runtime_report(
        &layout.runtime_dir(),
        &layout.runtime_report_path(),
        &config.algorithms,
    )?;

    output::write_completion_marker(&layout.completion_marker_path())?;
    info!(dataset = layout.name(), "stats summary complete");
    Ok(())
}
