//! Average ranks with tie bookkeeping.
//!
//! All rank-based tests in [`nonparametric`](crate::nonparametric) share the
//! same convention: ranks start at 1, tied values receive the mean of the
//! ranks they span, and the size of every tie group is kept so the tests can
//! apply their tie corrections.

/// Ranks of a sample in its original order, plus the sizes of its tie groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranks {
    /// Rank of each input value, in input order.
    pub ranks: Vec<f64>,
    /// Size of each group of equal values (groups of size 1 included).
    pub tie_groups: Vec<usize>,
}

impl Ranks {
    /// Ranks `values`, assigning average ranks to ties.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldstats_stats::rank::Ranks;
    ///
    /// let ranks = Ranks::new(&[0.3, 0.1, 0.3, 0.2]);
    /// assert_eq!(ranks.ranks, vec![3.5, 1.0, 3.5, 2.0]);
    /// assert_eq!(ranks.tie_groups, vec![1, 1, 2]);
    /// ```
    #[expect(clippy::cast_precision_loss, clippy::float_cmp)]
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let mut order = (0..values.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; values.len()];
        let mut tie_groups = vec![];
        let mut start = 0;
        while start < order.len() {
            let mut end = start + 1;
            while end < order.len() && values[order[end]] == values[order[start]] {
                end += 1;
            }
            // ranks are 1-based: positions start..end hold ranks start+1..=end
            let rank = (start + 1 + end) as f64 / 2.0;
            for &idx in &order[start..end] {
                ranks[idx] = rank;
            }
            tie_groups.push(end - start);
            start = end;
        }

        Self { ranks, tie_groups }
    }

    /// Returns `true` if at least one value occurs more than once.
    #[must_use]
    pub fn has_ties(&self) -> bool {
        self.tie_groups.iter().any(|&t| t > 1)
    }

    /// Sum of `t^3 - t` over all tie groups.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.tie_groups
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ties() {
        let ranks = Ranks::new(&[10.0, 30.0, 20.0]);
        assert_eq!(ranks.ranks, vec![1.0, 3.0, 2.0]);
        assert!(!ranks.has_ties());
        assert_eq!(ranks.tie_term(), 0.0);
    }

    #[test]
    fn test_all_equal() {
        let ranks = Ranks::new(&[0.5; 4]);
        assert_eq!(ranks.ranks, vec![2.5; 4]);
        assert_eq!(ranks.tie_groups, vec![4]);
        assert_eq!(ranks.tie_term(), 60.0);
    }

    #[test]
    fn test_rank_sum_is_triangular() {
        let values = [0.4, 0.4, 0.1, 0.9, 0.9, 0.9, 0.2];
        let ranks = Ranks::new(&values);
        let sum = ranks.ranks.iter().sum::<f64>();
        assert_eq!(sum, 28.0);
    }

    #[test]
    fn test_empty() {
        let ranks = Ranks::new(&[]);
        assert!(ranks.ranks.is_empty());
        assert!(ranks.tie_groups.is_empty());
    }
}
