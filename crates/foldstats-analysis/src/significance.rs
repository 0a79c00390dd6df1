//! Significance testing between algorithms.
//!
//! Kruskal-Wallis is run once per metric over all algorithms' fold samples.
//! For metrics that come out significant, every unordered pair of algorithms
//! is compared with the Wilcoxon signed-rank and Mann-Whitney U tests.
//!
//! Degenerate inputs never abort the job: a failed Kruskal-Wallis test is
//! reported with the first algorithm's samples as statistic and p-value 1,
//! and a pair of identical samples gets the `NA` sentinel with p-value 1.

use std::fmt;

use foldstats_stats::nonparametric::{
    self, NonParametricError, TestOutcome, kruskal_wallis,
};
use tracing::{info, warn};

use crate::{algorithm::Algorithm, metric::Metric, performance::AlgorithmMetricSeries};

/// Statistic cell of a significance table.
#[derive(Debug, Clone, PartialEq)]
pub enum Statistic {
    Value(f64),
    /// Raw samples reported in place of a statistic when Kruskal-Wallis fails.
    Samples(Vec<f64>),
    NotAvailable,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Samples(samples) => write!(f, "{samples:?}"),
            Self::NotAvailable => f.write_str("NA"),
        }
    }
}

/// Outcome of one test, flagged against the significance cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub statistic: Statistic,
    pub p_value: f64,
    pub significant: bool,
}

impl TestSummary {
    fn from_outcome(outcome: TestOutcome, sig_cutoff: f64) -> Self {
        Self {
            statistic: Statistic::Value(outcome.statistic),
            p_value: outcome.p_value,
            significant: outcome.p_value < sig_cutoff,
        }
    }

    fn non_significant(statistic: Statistic) -> Self {
        Self {
            statistic,
            p_value: 1.0,
            significant: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KruskalWallisRow {
    pub metric: Metric,
    pub summary: TestSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairwiseTest {
    WilcoxonSignedRank,
    MannWhitneyU,
}

impl PairwiseTest {
    pub const ALL: [Self; 2] = [Self::WilcoxonSignedRank, Self::MannWhitneyU];

    /// File-name prefix of this test's tables.
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::WilcoxonSignedRank => "WilcoxonRank",
            Self::MannWhitneyU => "MannWhitneyU",
        }
    }

    fn run(self, x: &[f64], y: &[f64]) -> Result<TestOutcome, NonParametricError> {
        match self {
            Self::WilcoxonSignedRank => nonparametric::wilcoxon_signed_rank(x, y),
            Self::MannWhitneyU => nonparametric::mann_whitney_u(x, y),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PairwiseRow {
    pub first: Algorithm,
    pub second: Algorithm,
    pub summary: TestSummary,
}

/// All pairwise comparisons of one test for one metric.
#[derive(Debug, Clone)]
pub struct PairwiseTable {
    pub test: PairwiseTest,
    pub metric: Metric,
    pub rows: Vec<PairwiseRow>,
}

#[derive(Debug, Clone)]
pub struct SignificanceReport {
    /// One row per metric, in [`Metric::ALL`] order.
    pub kruskal_wallis: Vec<KruskalWallisRow>,
    /// Pairwise tables for the metrics flagged by Kruskal-Wallis.
    pub pairwise: Vec<PairwiseTable>,
}

/// Compares all algorithms' fold samples.
///
/// Returns `None` when fewer than two algorithms are present.
#[must_use]
pub fn compare_algorithms(
    series: &[AlgorithmMetricSeries],
    sig_cutoff: f64,
) -> Option<SignificanceReport> {
    if series.len() < 2 {
        return None;
    }

    let mut kruskal_rows = vec![];
    let mut pairwise = vec![];
    for metric in Metric::ALL {
        let summary = kruskal_wallis_summary(series, metric, sig_cutoff);
        if summary.significant {
            info!(metric = %metric, p_value = summary.p_value, "significant difference between algorithms");
            for test in PairwiseTest::ALL {
                pairwise.push(pairwise_table(series, metric, test, sig_cutoff));
            }
        }
        kruskal_rows.push(KruskalWallisRow { metric, summary });
    }

    Some(SignificanceReport {
        kruskal_wallis: kruskal_rows,
        pairwise,
    })
}

fn kruskal_wallis_summary(
    series: &[AlgorithmMetricSeries],
    metric: Metric,
    sig_cutoff: f64,
) -> TestSummary {
    let groups = series.iter().map(|s| s.samples(metric)).collect::<Vec<_>>();
    match kruskal_wallis(&groups) {
        Ok(outcome) => TestSummary::from_outcome(outcome, sig_cutoff),
        Err(e) => {
            warn!(metric = %metric, error = %e, "Kruskal-Wallis test failed, reporting as non-significant");
            TestSummary::non_significant(Statistic::Samples(groups[0].to_vec()))
        }
    }
}

fn pairwise_table(
    series: &[AlgorithmMetricSeries],
    metric: Metric,
    test: PairwiseTest,
    sig_cutoff: f64,
) -> PairwiseTable {
    let mut rows = vec![];
    for (i, first) in series.iter().enumerate() {
        for second in &series[i + 1..] {
            let x = first.samples(metric);
            let y = second.samples(metric);
            let summary = if x == y {
                TestSummary::non_significant(Statistic::NotAvailable)
            } else {
                match test.run(x, y) {
                    Ok(outcome) => TestSummary::from_outcome(outcome, sig_cutoff),
                    Err(e) => {
                        warn!(
                            metric = %metric,
                            first = %first.algorithm,
                            second = %second.algorithm,
                            error = %e,
                            "pairwise test failed, reporting as non-significant"
                        );
                        TestSummary::non_significant(Statistic::NotAvailable)
                    }
                }
            };
            rows.push(PairwiseRow {
                first: first.algorithm,
                second: second.algorithm,
                summary,
            });
        }
    }
    PairwiseTable { test, metric, rows }
}
