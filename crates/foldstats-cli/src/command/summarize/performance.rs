use anyhow::Context;
use foldstats_analysis::{
    collect::{AlgorithmResults, collect_algorithm_results},
    config::JobConfig,
    layout::DatasetLayout,
    metric::Metric,
    reconcile::FeatureIndex,
    significance::compare_algorithms,
};
use tracing::{info, instrument};

use crate::{output, plot};

/// Reads every selected algorithm's folds and writes its per-fold outputs.
#[instrument(skip_all, fields(dataset = layout.name()))]
pub(super) fn collect_and_export(
    layout: &DatasetLayout,
    config: &JobConfig,
    features: &FeatureIndex,
) -> anyhow::Result<Vec<AlgorithmResults>> {
    let results_dir = layout.results_dir();
    let fi_dir = layout.feature_importance_dir();

    let mut all_results = Vec::with_capacity(config.algorithms.len());
    for &algorithm in &config.algorithms {
        let results =
            collect_algorithm_results(layout, algorithm, features, config.cv_partitions)
                .with_context(|| format!("Failed to collect results of {algorithm}"))?;
        info!(algorithm = %algorithm, folds = results.metrics.len(), "collected fold results");

        let abbrev = algorithm.abbrev();
        output::write_performance_csv(
            &results_dir.join(format!("{abbrev}_performance.csv")),
            &results.metrics,
        )?;
        output::write_feature_importance_csv(
            &fi_dir.join(format!("{abbrev}_FI.csv")),
            features.names(),
            &results.feature_importance,
        )?;
        for (fold, matrix) in results.confusion_matrices.iter().enumerate() {
            if matrix.is_empty() {
                continue;
            }
            plot::plot_confusion_matrix(
                &results_dir.join(format!("{abbrev}_CV_{fold}_ConfusionMatrix.svg")),
                &format!("{algorithm} (CV {fold})"),
                matrix,
            )?;
        }
        all_results.push(results);
    }
    Ok(all_results)
}

/// Writes the mean AUC plot and the mean and standard deviation tables.
///
/// The standard deviation table needs at least two folds; the mean outputs
/// are already written when it fails.
pub(super) fn export_summaries(
    layout: &DatasetLayout,
    results: &[AlgorithmResults],
) -> anyhow::Result<()> {
    let results_dir = layout.results_dir();

    let mean_aucs = results
        .iter()
        .map(|r| -> anyhow::Result<_> { Ok((r.algorithm, r.metrics.mean(Metric::RocAuc)?)) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    plot::plot_mean_auc(&results_dir.join("Summary_MeanAUC.svg"), &mean_aucs)?;

    let means = results
        .iter()
        .map(|r| -> anyhow::Result<_> { Ok((r.algorithm, r.metrics.means()?)) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    output::write_metric_summary_csv(&results_dir.join("Summary_performance_mean.csv"), &means)?;

    let std_devs = results
        .iter()
        .map(|r| -> anyhow::Result<_> { Ok((r.algorithm, r.metrics.std_devs()?)) })
        .collect::<anyhow::Result<Vec<_>>>()
        .context("Failed to compute metric standard deviations")?;
    output::write_metric_summary_csv(
        &results_dir.join("Summary_performance_std.csv"),
        &std_devs,
    )?;
    Ok(())
}

pub(super) fn plot_metric_boxplots(
    layout: &DatasetLayout,
    results: &[AlgorithmResults],
) -> anyhow::Result<()> {
    let dir = layout.metric_boxplot_dir();
    output::create_dir(&dir)?;

    let labels = results
        .iter()
        .map(|r| r.algorithm.name().to_owned())
        .collect::<Vec<_>>();
    for metric in Metric::ALL {
        let samples = results
            .iter()
            .map(|r| r.metrics.samples(metric).to_vec())
            .collect::<Vec<_>>();
        plot::plot_boxplots(
            &dir.join(format!("Compare_{}.svg", metric.label())),
            metric.label(),
            "ML Algorithm",
            metric.label(),
            &labels,
            &samples,
        )?;
    }
    Ok(())
}

/// Runs the significance tests and writes their tables.
///
/// Nothing is written when only one algorithm is selected.
#[instrument(skip_all)]
pub(super) fn export_significance(
    layout: &DatasetLayout,
    config: &JobConfig,
    results: &[AlgorithmResults],
) -> anyhow::Result<()> {
    let series = results.iter().map(|r| r.metrics.clone()).collect::<Vec<_>>();
    let Some(report) = compare_algorithms(&series, config.sig_cutoff) else {
        info!("single algorithm selected, skipping significance tests");
        return Ok(());
    };

    let dir = layout.significance_dir();
    output::create_dir(&dir)?;
    output::write_kruskal_wallis_csv(&dir.join("KruskalWallis.csv"), &report.kruskal_wallis)?;
    for table in &report.pairwise {
        output::write_pairwise_csv(&dir.join(output::pairwise_file_name(table)), table)?;
    }
    Ok(())
}
