//! Statistical utilities for summarizing cross-validation results.
//!
//! This crate provides the numeric building blocks used by the stats job:
//!
//! - **Descriptive statistics**: mean, median, sample variance and sample standard deviation
//! - **Ranking**: average ranks with tie bookkeeping, shared by the rank-based tests
//! - **Non-parametric tests**: Kruskal-Wallis H, Wilcoxon signed-rank and Mann-Whitney U
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing per-fold samples
//! - [`rank`]: Average ranks and tie correction terms
//! - [`nonparametric`]: Rank-based significance tests returning `(statistic, p-value)`
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use foldstats_stats::descriptive::DescriptiveStats;
//!
//! let values = [0.8, 0.9, 1.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert!((stats.mean - 0.9).abs() < 1e-12);
//! assert!((stats.sample_std_dev.unwrap() - 0.1).abs() < 1e-12);
//! ```
//!
//! ## Comparing several groups
//!
//! ```
//! use foldstats_stats::nonparametric::kruskal_wallis;
//!
//! let a = [0.91, 0.93, 0.92];
//! let b = [0.71, 0.70, 0.72];
//! let c = [0.81, 0.80, 0.82];
//! let outcome = kruskal_wallis(&[&a, &b, &c]).unwrap();
//! assert!(outcome.p_value < 0.05);
//! ```

pub mod descriptive;
pub mod nonparametric;
pub mod rank;
