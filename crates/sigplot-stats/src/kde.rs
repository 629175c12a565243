//! Gaussian kernel density estimation
//!
//! Used to shape violin outlines. Bandwidth follows Scott's rule
//! (`σ · n^(-1/5)`, sample standard deviation), and densities are evaluated
//! on an evenly spaced grid that extends `cut` bandwidths past the data.

use serde::{Deserialize, Serialize};

use crate::summary::SummaryStats;
use crate::{StatsError, StatsResult};

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Density values sampled on an evenly spaced support grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityGrid {
    /// Grid positions (ascending)
    pub support: Vec<f64>,
    /// Density at each grid position
    pub density: Vec<f64>,
}

impl DensityGrid {
    /// Largest density on the grid
    pub fn peak(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    /// Lowest and highest support positions
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((*self.support.first()?, *self.support.last()?))
    }
}

/// Gaussian KDE over a one-dimensional sample
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Build a KDE using Scott's rule for the bandwidth
    pub fn new(data: &[f64]) -> StatsResult<Self> {
        let bandwidth = scott_bandwidth(data)?;
        Self::with_bandwidth(data, bandwidth)
    }

    /// Build a KDE with an explicit bandwidth
    pub fn with_bandwidth(data: &[f64], bandwidth: f64) -> StatsResult<Self> {
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(StatsError::InvalidBandwidth(bandwidth));
        }
        let points: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if points.is_empty() {
            return Err(StatsError::EmptySample);
        }
        Ok(Self { points, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Evaluate the density at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let inv_h = 1.0 / self.bandwidth;
        let sum: f64 = self
            .points
            .iter()
            .map(|&p| {
                let z = (x - p) * inv_h;
                (-0.5 * z * z).exp()
            })
            .sum();
        sum * INV_SQRT_2PI * inv_h / self.points.len() as f64
    }

    /// Evaluate on `gridsize` points spanning the data ± `cut` bandwidths
    pub fn density_grid(&self, gridsize: usize, cut: f64) -> DensityGrid {
        let lo = self.points.iter().copied().fold(f64::INFINITY, f64::min) - cut * self.bandwidth;
        let hi =
            self.points.iter().copied().fold(f64::NEG_INFINITY, f64::max) + cut * self.bandwidth;

        let n = gridsize.max(2);
        let step = (hi - lo) / (n - 1) as f64;
        let support: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
        let density = support.iter().map(|&x| self.evaluate(x)).collect();

        DensityGrid { support, density }
    }
}

/// Scott's rule bandwidth: `σ · n^(-1/5)`
///
/// Fails with `InvalidBandwidth(0.0)` when the sample has no spread.
pub fn scott_bandwidth(data: &[f64]) -> StatsResult<f64> {
    let stats = SummaryStats::from_data(data);
    if stats.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let bw = stats.std_dev * (stats.count as f64).powf(-0.2);
    if bw <= 0.0 || !bw.is_finite() {
        return Err(StatsError::InvalidBandwidth(bw));
    }
    Ok(bw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_density_is_normal_pdf() {
        let kde = GaussianKde::with_bandwidth(&[0.0], 1.0).unwrap();
        assert!((kde.evaluate(0.0) - INV_SQRT_2PI).abs() < 1e-12);
        assert!((kde.evaluate(1.0) - INV_SQRT_2PI * (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let data = [1.0, 2.0, 2.5, 3.0, 7.0];
        let kde = GaussianKde::new(&data).unwrap();
        let grid = kde.density_grid(2000, 6.0);
        let step = grid.support[1] - grid.support[0];
        let area: f64 = grid.density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_grid_extends_past_data() {
        let data = [1.0, 2.0, 3.0];
        let kde = GaussianKde::new(&data).unwrap();
        let grid = kde.density_grid(100, 2.0);
        let (lo, hi) = grid.bounds().unwrap();
        assert!((lo - (1.0 - 2.0 * kde.bandwidth())).abs() < 1e-12);
        assert!((hi - (3.0 + 2.0 * kde.bandwidth())).abs() < 1e-9);
        assert_eq!(grid.support.len(), 100);
    }

    #[test]
    fn test_constant_sample_has_no_bandwidth() {
        assert_eq!(
            scott_bandwidth(&[4.0, 4.0, 4.0]),
            Err(StatsError::InvalidBandwidth(0.0))
        );
        assert!(GaussianKde::with_bandwidth(&[1.0], -1.0).is_err());
    }
}
