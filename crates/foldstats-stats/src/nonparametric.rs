//! Rank-based significance tests.
//!
//! Every test returns a [`TestOutcome`] holding the test statistic and a
//! two-sided p-value. Degenerate inputs (for example every value identical)
//! are reported as [`NonParametricError`] so callers can decide how to
//! recover.
//!
//! # Conventions
//!
//! - [`kruskal_wallis`]: H statistic with tie correction, chi-squared tail with `k - 1` degrees of freedom.
//! - [`wilcoxon_signed_rank`]: zero differences are split evenly between the positive and
//!   negative rank sums; the statistic is the smaller of the two sums. The exact null
//!   distribution is used for up to 25 pairs without zeros or ties, the normal
//!   approximation otherwise.
//! - [`mann_whitney_u`]: the statistic is U of the first sample. The exact null
//!   distribution is used when either sample has at most 8 values and there are no
//!   ties, the normal approximation with continuity correction otherwise.

use std::iter;

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::rank::Ranks;

const EXACT_SIGNED_RANK_MAX_PAIRS: usize = 25;
const EXACT_RANK_SUM_MAX_SMALLER: usize = 8;

/// Result of a significance test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    /// The test statistic.
    pub statistic: f64,
    /// Two-sided p-value in `[0, 1]`.
    pub p_value: f64,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NonParametricError {
    #[display("at least two groups are required, got {groups}")]
    TooFewGroups { groups: usize },
    #[display("sample {index} is empty")]
    EmptySample { index: usize },
    #[display("paired samples differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("sample contains a non-finite value")]
    NonFinite,
    #[display("all values are identical")]
    AllValuesIdentical,
    #[display("failed to build reference distribution: {reason}")]
    Distribution { reason: String },
}

/// Kruskal-Wallis H-test for independent samples.
///
/// # Examples
///
/// ```
/// use foldstats_stats::nonparametric::kruskal_wallis;
///
/// let outcome = kruskal_wallis(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
/// assert!((outcome.statistic - 27.0 / 7.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<TestOutcome, NonParametricError> {
    if groups.len() < 2 {
        return Err(NonParametricError::TooFewGroups {
            groups: groups.len(),
        });
    }
    if let Some(index) = groups.iter().position(|g| g.is_empty()) {
        return Err(NonParametricError::EmptySample { index });
    }

    let pooled = groups
        .iter()
        .flat_map(|g| g.iter().copied())
        .collect::<Vec<_>>();
    ensure_finite(&pooled)?;

    let ranks = Ranks::new(&pooled);
    let n = pooled.len() as f64;

    let mut offset = 0;
    let mut weighted_sum = 0.0;
    for group in groups {
        let rank_sum = ranks.ranks[offset..offset + group.len()]
            .iter()
            .sum::<f64>();
        weighted_sum += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }

    let correction = 1.0 - ranks.tie_term() / (n * n * n - n);
    if correction <= 0.0 {
        return Err(NonParametricError::AllValuesIdentical);
    }
    let h = (12.0 / (n * (n + 1.0)) * weighted_sum - 3.0 * (n + 1.0)) / correction;
    let h = h.max(0.0);

    let chi_squared = ChiSquared::new((groups.len() - 1) as f64).map_err(|e| {
        NonParametricError::Distribution {
            reason: e.to_string(),
        }
    })?;

    Ok(TestOutcome {
        statistic: h,
        p_value: chi_squared.sf(h).clamp(0.0, 1.0),
    })
}

/// Wilcoxon signed-rank test for paired samples.
///
/// # Examples
///
/// ```
/// use foldstats_stats::nonparametric::wilcoxon_signed_rank;
///
/// let x = [0.92, 0.95, 0.91, 0.97, 0.93];
/// let y = [0.81, 0.82, 0.84, 0.80, 0.79];
/// let outcome = wilcoxon_signed_rank(&x, &y).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert!((outcome.p_value - 0.0625).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<TestOutcome, NonParametricError> {
    if x.len() != y.len() {
        return Err(NonParametricError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(NonParametricError::EmptySample { index: 0 });
    }
    ensure_finite(x)?;
    ensure_finite(y)?;

    let differences = iter::zip(x, y).map(|(a, b)| a - b).collect::<Vec<_>>();
    let magnitudes = differences.iter().map(|d| d.abs()).collect::<Vec<_>>();
    let ranks = Ranks::new(&magnitudes);

    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut has_zeros = false;
    for (&d, &rank) in iter::zip(&differences, &ranks.ranks) {
        if d > 0.0 {
            positive += rank;
        } else if d < 0.0 {
            negative += rank;
        } else {
            has_zeros = true;
            positive += rank / 2.0;
            negative += rank / 2.0;
        }
    }
    let statistic = f64::min(positive, negative);

    let pairs = differences.len();
    let p_value = if pairs <= EXACT_SIGNED_RANK_MAX_PAIRS && !has_zeros && !ranks.has_ties() {
        signed_rank_exact_p(pairs, statistic)
    } else {
        let n = pairs as f64;
        let mean = n * (n + 1.0) / 4.0;
        let variance = (n * (n + 1.0) * (2.0 * n + 1.0) - 0.5 * ranks.tie_term()) / 24.0;
        if variance <= 0.0 {
            return Err(NonParametricError::AllValuesIdentical);
        }
        let z = (statistic - mean) / variance.sqrt();
        2.0 * standard_normal()?.sf(z.abs())
    };

    Ok(TestOutcome {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Mann-Whitney U test for independent samples.
///
/// # Examples
///
/// ```
/// use foldstats_stats::nonparametric::mann_whitney_u;
///
/// let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert!((outcome.p_value - 0.1).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestOutcome, NonParametricError> {
    if x.is_empty() {
        return Err(NonParametricError::EmptySample { index: 0 });
    }
    if y.is_empty() {
        return Err(NonParametricError::EmptySample { index: 1 });
    }
    ensure_finite(x)?;
    ensure_finite(y)?;

    let pooled = x.iter().chain(y).copied().collect::<Vec<_>>();
    let ranks = Ranks::new(&pooled);

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let rank_sum = ranks.ranks[..x.len()].iter().sum::<f64>();
    let u1 = rank_sum - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = f64::max(u1, u2);

    let use_exact = !ranks.has_ties()
        && (x.len() <= EXACT_RANK_SUM_MAX_SMALLER || y.len() <= EXACT_RANK_SUM_MAX_SMALLER);
    let p_value = if use_exact {
        2.0 * rank_sum_upper_tail(x.len(), y.len(), u)
    } else {
        let n = n1 + n2;
        let variance = n1 * n2 / 12.0 * ((n + 1.0) - ranks.tie_term() / (n * (n - 1.0)));
        if variance <= 0.0 {
            return Err(NonParametricError::AllValuesIdentical);
        }
        let z = (u - n1 * n2 / 2.0 - 0.5) / variance.sqrt();
        2.0 * standard_normal()?.sf(z)
    };

    Ok(TestOutcome {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

fn ensure_finite(values: &[f64]) -> Result<(), NonParametricError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(NonParametricError::NonFinite)
    }
}

fn standard_normal() -> Result<Normal, NonParametricError> {
    Normal::new(0.0, 1.0).map_err(|e| NonParametricError::Distribution {
        reason: e.to_string(),
    })
}

/// Two-sided exact p-value of the signed-rank statistic `t` for `n` pairs.
///
/// Counts the subsets of `{1, ..., n}` whose sum does not exceed `t`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn signed_rank_exact_p(n: usize, t: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }
    let t = t.round() as usize;
    let lower_tail = counts[..=t.min(max_sum)].iter().sum::<f64>();
    2.0 * lower_tail / 2.0_f64.powi(n as i32)
}

/// Probability that U is at least `u` under the null hypothesis, for sample sizes `n1` and `n2`.
///
/// Enumerates rank sums of every `n1`-subset of `{1, ..., n1 + n2}`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rank_sum_upper_tail(n1: usize, n2: usize, u: f64) -> f64 {
    let n = n1 + n2;
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![vec![0.0_f64; max_sum + 1]; n1 + 1];
    counts[0][0] = 1.0;
    for rank in 1..=n {
        for size in (1..=n1.min(rank)).rev() {
            for s in (rank..=max_sum).rev() {
                counts[size][s] += counts[size - 1][s - rank];
            }
        }
    }

    let offset = n1 * (n1 + 1) / 2;
    let threshold = offset + u.round() as usize;
    let total = counts[n1].iter().sum::<f64>();
    let tail = counts[n1].iter().skip(threshold).sum::<f64>();
    tail / total
}
