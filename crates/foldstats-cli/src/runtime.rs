//! Per-phase runtime files and the combined runtime report.
//!
//! Every pipeline phase leaves `runtime_<ref>.txt` holding its elapsed
//! seconds. The report sums the values per reference and lists them in
//! pipeline order.

use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use anyhow::Context;
use foldstats_analysis::algorithm::Algorithm;
use tracing::{debug, info};

use crate::output;

/// Reference of this job's own runtime file.
pub const STATS_REFERENCE: &str = "Stats";

const LEADING_PHASES: [(&str, &str); 5] = [
    ("exploratory", "Exploratory Analysis"),
    ("preprocessing", "Preprocessing"),
    ("mutualinformation", "Mutual Information"),
    ("multisurf", "MultiSURF"),
    ("featureselection", "Feature Selection"),
];

const TRAILING_PHASES: [(&str, &str); 4] = [
    ("eLCS", "eLCS"),
    ("XCS", "XCS"),
    ("ExSTraCS", "ExSTraCS"),
    (STATS_REFERENCE, "Stats Summary"),
];

pub fn runtime_file_name(reference: &str) -> String {
    format!("runtime_{reference}.txt")
}

pub fn write_runtime(dir: &Path, reference: &str, elapsed: Duration) -> anyhow::Result<()> {
    output::create_dir(dir)?;
    let path = dir.join(runtime_file_name(reference));
    fs::write(&path, elapsed.as_secs_f64().to_string())
        .with_context(|| format!("Failed to write runtime file: {}", path.display()))
}

/// Reference part of a runtime file name: the stem after the first `_`.
fn reference_of(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    stem.split_once('_').map(|(_, reference)| reference)
}

/// Reads every runtime file in `dir` and sums the seconds per reference.
///
/// Algorithm references given by full name are folded into the abbreviation.
pub fn read_runtime_totals(dir: &Path) -> anyhow::Result<BTreeMap<String, f64>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read runtime directory: {}", dir.display()))?;

    let mut totals = BTreeMap::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read runtime directory: {}", dir.display()))?
            .path();
        if path.extension().is_none_or(|ext| ext != "txt") {
            continue;
        }
        let Some(reference) = reference_of(&path) else {
            debug!(path = %path.display(), "skipping runtime file without reference");
            continue;
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read runtime file: {}", path.display()))?;
        let seconds = content
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid runtime value in {}", path.display()))?;

        let key = Algorithm::from_reference(reference)
            .map_or_else(|| reference.to_owned(), |a| a.abbrev().to_owned());
        *totals.entry(key).or_insert(0.0) += seconds;
    }
    Ok(totals)
}

/// Orders the totals into report rows.
///
/// Only references that are present are listed. Algorithm rows are limited
/// to `algorithms`.
pub fn report_rows(totals: &BTreeMap<String, f64>, algorithms: &[Algorithm]) -> Vec<(String, f64)> {
    let algorithm_rows = algorithms
        .iter()
        .map(|a| (a.abbrev(), a.runtime_label()))
        .collect::<Vec<_>>();
    let known = LEADING_PHASES
        .iter()
        .chain(&algorithm_rows)
        .chain(&TRAILING_PHASES)
        .collect::<Vec<_>>();

    for reference in totals.keys() {
        let listed = known.iter().any(|(r, _)| r == reference);
        let unselected = Algorithm::from_reference(reference).is_some();
        if !listed && !unselected {
            debug!(reference, "omitting unknown runtime reference");
        }
    }

    known
        .into_iter()
        .filter_map(|&(reference, label)| {
            totals
                .get(reference)
                .map(|&seconds| (label.to_owned(), seconds))
        })
        .collect()
}

pub fn write_runtime_report(
    runtime_dir: &Path,
    report_path: &Path,
    algorithms: &[Algorithm],
) -> anyhow::Result<()> {
    let totals = read_runtime_totals(runtime_dir)?;
    let rows = report_rows(&totals, algorithms);

    let mut writer = csv::Writer::from_path(report_path)
        .with_context(|| format!("Failed to create runtime report: {}", report_path.display()))?;
    writer
        .write_record(["Pipeline Component", "Time (sec)"])
        .with_context(|| format!("Failed to write runtime report: {}", report_path.display()))?;
    for (label, seconds) in &rows {
        writer
            .write_record([label.clone(), output::float_field(*seconds)])
            .with_context(|| format!("Failed to write runtime report: {}", report_path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush runtime report: {}", report_path.display()))?;

    info!(path = %report_path.display(), components = rows.len(), "wrote runtime report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_reference_of() {
        assert_eq!(reference_of(Path::new("runtime_Stats.txt")), Some("Stats"));
        assert_eq!(
            reference_of(Path::new("runtime_Naive Bayes.txt")),
            Some("Naive Bayes")
        );
        assert_eq!(reference_of(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_totals_are_summed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "runtime_preprocessing.txt", "1.5\n");
        write(dir.path(), "runtime_RF.txt", "2.0");
        write(dir.path(), "runtime_Random Forest.txt", "0.5");
        write(dir.path(), "readme.md", "not a runtime");

        let totals = read_runtime_totals(dir.path()).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["preprocessing"], 1.5);
        assert_eq!(totals["RF"], 2.5);
    }

    #[test]
    fn test_invalid_value_names_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "runtime_exploratory.txt", "fast");
        let err = read_runtime_totals(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("runtime_exploratory.txt"));
    }

    #[test]
    fn test_report_order() {
        let totals = [
            ("Stats", 4.0),
            ("SVM", 3.0),
            ("exploratory", 1.0),
            ("NB", 2.0),
            ("unknown", 9.0),
            ("ExSTraCS", 5.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
        let rows = report_rows(&totals, &[Algorithm::NaiveBayes, Algorithm::Svm]);
        let labels = rows.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                "Exploratory Analysis",
                "Naive Bayes",
                "Support Vector Machine",
                "ExSTraCS",
                "Stats Summary"
            ]
        );
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let runtime_dir = dir.path().join("runtime");
        write_runtime(&runtime_dir, STATS_REFERENCE, Duration::from_millis(1500)).unwrap();
        write(&runtime_dir, "runtime_featureselection.txt", "0.25");

        let report = dir.path().join("runtimes.csv");
        write_runtime_report(&runtime_dir, &report, &Algorithm::ALL).unwrap();
        assert_eq!(
            fs::read_to_string(report).unwrap(),
            "Pipeline Component,Time (sec)\nFeature Selection,0.25\nStats Summary,1.5\n"
        );
    }
}
