//! CSV and marker files written by the stats job.

use std::{fs, fs::File, path::Path};

use anyhow::Context;
use foldstats_analysis::{
    algorithm::Algorithm,
    metric::Metric,
    performance::AlgorithmMetricSeries,
    significance::{KruskalWallisRow, PairwiseTable, Statistic, TestSummary},
};
use tracing::info;

/// Formats a float the way it is written to every output CSV.
pub fn float_field(value: f64) -> String {
    format!("{value:?}")
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

fn significance_flag(summary: &TestSummary) -> &'static str {
    if summary.significant { "*" } else { "" }
}

fn create_writer(path: &Path) -> anyhow::Result<csv::Writer<File>> {
    csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))
}

fn write_rows<I, R>(path: &Path, header: &[&str], rows: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut writer = create_writer(path)?;
    writer
        .write_record(header)
        .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
    info!(path = %path.display(), "wrote CSV");
    Ok(())
}

fn metric_header(first: &'static str) -> Vec<&'static str> {
    std::iter::once(first)
        .chain(Metric::ALL.map(Metric::label))
        .collect()
}

/// One row per fold, one column per metric.
pub fn write_performance_csv(path: &Path, series: &AlgorithmMetricSeries) -> anyhow::Result<()> {
    let header = Metric::ALL.map(Metric::label);
    let rows = (0..series.len()).map(|fold| {
        Metric::ALL
            .into_iter()
            .map(move |metric| float_field(series.samples(metric)[fold]))
    });
    write_rows(path, &header, rows)
}

/// One row per algorithm with a value per metric, e.g. the fold means.
pub fn write_metric_summary_csv(path: &Path, rows: &[(Algorithm, Vec<f64>)]) -> anyhow::Result<()> {
    let header = metric_header("");
    let rows = rows.iter().map(|(algorithm, values)| {
        std::iter::once(algorithm.name().to_owned()).chain(values.iter().copied().map(float_field))
    });
    write_rows(path, &header, rows)
}

/// Reconciled feature importance, one row per fold.
pub fn write_feature_importance_csv(
    path: &Path,
    features: &[String],
    folds: &[Vec<f64>],
) -> anyhow::Result<()> {
    let header = features.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = folds
        .iter()
        .map(|fold| fold.iter().copied().map(float_field));
    write_rows(path, &header, rows)
}

pub fn write_kruskal_wallis_csv(path: &Path, rows: &[KruskalWallisRow]) -> anyhow::Result<()> {
    let header = ["", "Statistic", "P-Value", "Sig(*)"];
    let rows = rows.iter().map(|row| {
        let statistic = match &row.summary.statistic {
            Statistic::Value(value) => float_field(round6(*value)),
            other => other.to_string(),
        };
        [
            row.metric.label().to_owned(),
            statistic,
            float_field(round6(row.summary.p_value)),
            significance_flag(&row.summary).to_owned(),
        ]
    });
    write_rows(path, &header, rows)
}

pub fn write_pairwise_csv(path: &Path, table: &PairwiseTable) -> anyhow::Result<()> {
    let header = ["Algorithm 1", "Algorithm 2", "Statistic", "P-Value", "Sig(*)"];
    let rows = table.rows.iter().map(|row| {
        let statistic = match &row.summary.statistic {
            Statistic::Value(value) => float_field(*value),
            other => other.to_string(),
        };
        [
            row.first.name().to_owned(),
            row.second.name().to_owned(),
            statistic,
            float_field(row.summary.p_value),
            significance_flag(&row.summary).to_owned(),
        ]
    });
    write_rows(path, &header, rows)
}

/// File name of a pairwise table, e.g. `WilcoxonRank_ROC_AUC.csv`.
pub fn pairwise_file_name(table: &PairwiseTable) -> String {
    format!("{}_{}.csv", table.test.file_prefix(), table.metric.label())
}

pub fn create_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

pub fn write_completion_marker(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, "complete")
        .with_context(|| format!("Failed to write completion marker: {}", path.display()))
}
