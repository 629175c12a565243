//! Summary statistics for sample groups
//!
//! Provides the summaries a comparative chart needs:
//! - Mean, variance, standard deviation
//! - Min, max, range
//! - Quartiles and Tukey box statistics (whiskers, fliers)

use serde::{Deserialize, Serialize};

use crate::{StatsError, StatsResult};

/// Whisker reach as a multiple of the interquartile range
pub const TUKEY_WHISKER: f64 = 1.5;

/// Summary statistics for a numeric sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean (average)
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    pub fn from_data(data: &[f64]) -> Self {
        let (finite, missing): (Vec<f64>, usize) = {
            let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
            let missing = data.len() - finite.len();
            (finite, missing)
        };

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let sum: f64 = finite.iter().sum();
        let mean = sum / count as f64;

        let ss: f64 = finite.iter().map(|x| (x - mean).powi(2)).sum();
        let variance = ss / count as f64;
        let std_dev = if count > 1 {
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        let mut sorted = finite;
        sorted.sort_by(f64::total_cmp);

        Self {
            count,
            missing,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            variance,
            std_dev,
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
        }
    }

    /// Create empty statistics (all NaN)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
        }
    }

    /// Whether any finite value was seen
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the interquartile range (q3 - q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quantile of already-sorted data using linear interpolation between
/// closest ranks (`pos = p * (n - 1)`).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Tukey box-plot statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    /// Lowest datum still within `q1 - 1.5 * IQR`
    pub whisker_low: f64,
    /// Highest datum still within `q3 + 1.5 * IQR`
    pub whisker_high: f64,
    /// Data beyond the whiskers
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box statistics, ignoring non-finite values
    pub fn from_data(data: &[f64]) -> StatsResult<Self> {
        let summary = SummaryStats::from_data(data);
        if summary.is_empty() {
            return Err(StatsError::EmptySample);
        }

        let reach = TUKEY_WHISKER * summary.iqr();
        let low_fence = summary.q1 - reach;
        let high_fence = summary.q3 + reach;

        let mut whisker_low = summary.q1;
        let mut whisker_high = summary.q3;
        let mut fliers = Vec::new();

        for &x in data.iter().filter(|x| x.is_finite()) {
            if x < low_fence || x > high_fence {
                fliers.push(x);
                continue;
            }
            whisker_low = whisker_low.min(x);
            whisker_high = whisker_high.max(x);
        }
        fliers.sort_by(f64::total_cmp);

        Ok(Self {
            q1: summary.q1,
            median: summary.median,
            q3: summary.q3,
            mean: summary.mean,
            whisker_low,
            whisker_high,
            fliers,
        })
    }

    /// Vertical extent covered by the box, whiskers and fliers
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.fliers.first().copied().unwrap_or(f64::INFINITY);
        let hi = self.fliers.last().copied().unwrap_or(f64::NEG_INFINITY);
        (self.whisker_low.min(lo), self.whisker_high.max(hi))
    }
}

/// Maximum finite value across several samples
pub fn max_across<'a, I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    samples
        .into_iter()
        .flat_map(|s| s.iter().copied())
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| Some(acc.map_or(x, |m: f64| m.max(x))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_stats_basic() {
        let data: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let stats = SummaryStats::from_data(&data);

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert!((stats.mean - 5.5).abs() < 1e-10);
        assert!((stats.median - 5.5).abs() < 1e-10);
        assert!((stats.q1 - 3.25).abs() < 1e-10);
        assert!((stats.q3 - 7.75).abs() < 1e-10);
    }

    #[test]
    fn test_summary_stats_with_nan() {
        let data = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
        let stats = SummaryStats::from_data(&data);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_single_value() {
        let stats = SummaryStats::from_data(&[3.0]);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.iqr(), 0.0);
    }

    #[test]
    fn test_box_stats_fliers() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = BoxStats::from_data(&data).unwrap();

        assert_eq!(b.fliers, vec![100.0]);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 5.0);
        assert_eq!(b.extent(), (1.0, 100.0));
    }

    #[test]
    fn test_box_stats_empty() {
        assert_eq!(BoxStats::from_data(&[]), Err(StatsError::EmptySample));
        assert_eq!(BoxStats::from_data(&[f64::NAN]), Err(StatsError::EmptySample));
    }

    #[test]
    fn test_max_across() {
        let a = [1.0, 7.0];
        let b = [f64::NAN, 3.0];
        assert_eq!(max_across([&a[..], &b[..]]), Some(7.0));
        assert_eq!(max_across(Vec::<&[f64]>::new()), None);
    }
}
