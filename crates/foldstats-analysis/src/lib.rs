//! Aggregation of cross-validation results across folds and algorithms
//!
//! This crate turns the per-fold artifacts of a finished training run into the
//! summaries and plot series of a dataset's stats job.
//!
//! # Overview
//!
//! ## Performance Workflow
//!
//! 1. **Validate Configuration** ([`config::JobConfig`]): Decode the algorithm mask and
//!    resolve the primary metric before anything is read
//! 2. **Read Folds** ([`fold::FoldResultReader`], [`layout::DatasetLayout`]): Load each
//!    fold's metrics bundle and test-set header
//! 3. **Aggregate Metrics** ([`performance::AlgorithmMetricSeries`]): Per-fold samples,
//!    means and sample standard deviations
//! 4. **Compare Algorithms** ([`significance::compare_algorithms`]): Kruskal-Wallis per
//!    metric, then pairwise Wilcoxon and Mann-Whitney tests for significant metrics
//!
//! ## Feature Importance Workflow
//!
//! 1. **Reconcile** ([`reconcile::FeatureIndex`]): Map fold-local importance vectors
//!    onto the original feature list, zero-filling dropped features
//! 2. **Aggregate** ([`importance::FeatureImportanceSummary`]): Average across folds,
//!    normalize, and collect the non-zero feature union
//! 3. **Select** ([`selection::select_from_summary`]): Rank candidates by
//!    performance-weighted importance and keep the top features
//! 4. **Transform** ([`composite::CompositeSeries`]): Derive the normalized, fractionated
//!    and weighted variants for stacked bar rendering
//!
//! [`collect::collect_algorithm_results`] drives steps 2-3 of the performance workflow
//! and step 1 of the feature importance workflow for one algorithm.
//!
//! # Examples
//!
//! ```no_run
//! use foldstats_analysis::{
//!     collect::collect_algorithm_results, config::JobConfig, config::JobSettings,
//!     importance::FeatureImportanceSummary, layout::DatasetLayout,
//!     reconcile::FeatureIndex, selection::select_from_summary,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let config = JobConfig::from_settings(&JobSettings {
//!     algorithm_mask: "0010100",
//!     cv_partitions: 3,
//!     class_label: "Class",
//!     instance_label: None,
//!     primary_metric: "balanced_accuracy",
//!     top_results: 20,
//!     sig_cutoff: 0.05,
//! })?;
//! let layout = DatasetLayout::new("experiment/mice", &config.class_label, None);
//! let features = FeatureIndex::new(layout.read_original_features()?);
//!
//! let mut importances = vec![];
//! for &algorithm in &config.algorithms {
//!     let results = collect_algorithm_results(&layout, algorithm, &features, config.cv_partitions)?;
//!     importances.push(results.importance()?);
//! }
//! let summary = FeatureImportanceSummary::new(importances);
//! let top = select_from_summary(&summary, config.top_results);
//! println!("{} features selected", top.len());
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
pub mod collect;
pub mod composite;
pub mod config;
pub mod fold;
pub mod importance;
pub mod layout;
pub mod metric;
pub mod performance;
pub mod reconcile;
pub mod selection;
pub mod significance;
