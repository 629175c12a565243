//! Wilcoxon rank-sum test
//!
//! Two-sample, two-sided test of whether values in one sample tend to be
//! larger than in the other. Uses the large-sample normal approximation
//! without tie correction:
//!
//! ```text
//! z = (R1 - n1 (n1 + n2 + 1) / 2) / sqrt(n1 n2 (n1 + n2 + 1) / 12)
//! p = 2 * Φ(-|z|)
//! ```
//!
//! where `R1` is the rank sum of the first sample in the pooled ranking
//! (ties receive their average rank).

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

/// Outcome of a rank-sum test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankSumResult {
    /// Standardised rank-sum statistic
    pub statistic: f64,
    /// Two-sided p-value; NaN when the test is undefined
    pub p_value: f64,
}

impl RankSumResult {
    fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
        }
    }
}

/// Run the rank-sum test on two samples.
///
/// Empty samples or any non-finite value make the test undefined and
/// yield NaN for both fields rather than an error.
pub fn rank_sum(a: &[f64], b: &[f64]) -> RankSumResult {
    if a.is_empty() || b.is_empty() {
        return RankSumResult::undefined();
    }
    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return RankSumResult::undefined();
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;

    let pooled: Vec<f64> = a.iter().chain(b).copied().collect();
    let ranks = average_ranks(&pooled);
    let r1: f64 = ranks[..a.len()].iter().sum();

    let expected = n1 * (n1 + n2 + 1.0) / 2.0;
    let sd = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    if sd <= 0.0 {
        return RankSumResult::undefined();
    }

    let z = (r1 - expected) / sd;
    let p = erfc(z.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0);

    RankSumResult {
        statistic: z,
        p_value: p,
    }
}

/// Ranks (1-based) of `values`, with tied values sharing their mean rank
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end (0-based) share ranks start+1..=end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_identical_samples_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = rank_sum(&a, &a);
        assert!(r.statistic.abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_separated_samples() {
        // Fully separated groups of 5: R1 = 15, E = 27.5, sd = sqrt(22.9166..)
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = rank_sum(&a, &b);

        assert!((r.statistic + 2.611_164_839).abs() < 1e-6);
        assert!((r.p_value - 0.009_023_4).abs() < 1e-5);
    }

    #[test]
    fn test_symmetric_in_p() {
        let a = [0.3, 1.2, 2.5, 0.9];
        let b = [2.2, 3.1, 4.0, 1.8, 2.9];
        let ab = rank_sum(&a, &b);
        let ba = rank_sum(&b, &a);
        assert!((ab.p_value - ba.p_value).abs() < 1e-12);
        assert!((ab.statistic + ba.statistic).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_inputs() {
        assert!(rank_sum(&[], &[1.0]).p_value.is_nan());
        assert!(rank_sum(&[f64::NAN, 1.0], &[2.0]).p_value.is_nan());
    }
}
