//! Random horizontal jitter for scatter overlays

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{PlotError, Result};

/// Standard deviation of jitter around a group centre, in x units
pub const JITTER_SCALE: f64 = 0.03;

/// Gaussian x offsets around group centres
#[derive(Debug)]
pub struct Jitter {
    rng: StdRng,
    normal: Normal<f64>,
}

impl Jitter {
    /// Jitter with standard deviation `scale`; `seed` makes it reproducible
    pub fn new(scale: f64, seed: Option<u64>) -> Result<Self> {
        let normal = Normal::new(0.0, scale)
            .map_err(|e| PlotError::Config(format!("jitter scale {scale}: {e}")))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { rng, normal })
    }

    /// `count` x positions drawn from `N(centre, scale)`
    pub fn positions(&mut self, centre: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| centre + self.normal.sample(&mut self.rng))
            .collect()
    }
}
