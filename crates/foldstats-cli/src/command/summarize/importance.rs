use anyhow::Context;
use foldstats_analysis::{
    collect::AlgorithmResults,
    composite::{CompositeSeries, CompositeVariant},
    config::JobConfig,
    importance::FeatureImportanceSummary,
    layout::DatasetLayout,
    reconcile::FeatureIndex,
    selection::select_from_summary,
};
use tracing::{info, instrument, warn};

use crate::plot;

/// Aggregates feature importance across algorithms and renders the
/// composite plots, plus per-algorithm boxplots when requested.
#[instrument(skip_all, fields(top_results = config.top_results))]
pub(super) fn export_feature_importance(
    layout: &DatasetLayout,
    config: &JobConfig,
    features: &FeatureIndex,
    results: &[AlgorithmResults],
    plot_fi_box: bool,
) -> anyhow::Result<()> {
    let dir = layout.feature_importance_dir();

    let importances = results
        .iter()
        .map(AlgorithmResults::importance)
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to average balanced accuracy for feature importance weights")?;
    let summary = FeatureImportanceSummary::new(importances);

    let top = select_from_summary(&summary, config.top_results);
    info!(
        non_zero = summary.non_zero_union.len(),
        selected = top.len(),
        ranked = top.was_ranked,
        "selected features for composite plots"
    );

    if plot_fi_box {
        for importance in &summary.algorithms {
            let per_feature = (0..features.len())
                .map(|i| importance.folds.iter().map(|fold| fold[i]).collect())
                .collect::<Vec<_>>();
            plot::plot_boxplots(
                &dir.join(format!("{}_boxplot.svg", importance.algorithm.abbrev())),
                importance.algorithm.name(),
                "Features",
                "Feature Importance Score",
                features.names(),
                &per_feature,
            )?;
        }
    }

    if top.is_empty() {
        warn!("no feature has positive importance, composite plots will be empty");
    }
    let series = CompositeSeries::build(&summary, &top);
    let names = series
        .features
        .iter()
        .map(|&i| features.name(i).to_owned())
        .collect::<Vec<_>>();
    for variant in CompositeVariant::ALL {
        plot::plot_composite(
            &dir.join(format!("Compare_FI_{}.svg", variant.file_tag())),
            &names,
            &series.algorithms,
            series.rows(variant),
            variant.axis_label(),
        )?;
    }
    Ok(())
}
