//! Beeswarm point placement
//!
//! Points are laid out in marker space (points, not data units) so that
//! markers of diameter `point_size` do not overlap. Placement is greedy
//! and deterministic: lowest value first, each point at the smallest
//! offset from the centre that clears every point already placed.

use tracing::warn;

/// Largest allowed offset from the group centre, in x data units
pub const MAX_HALF_WIDTH: f64 = 0.4;

/// Conversion between data units and marker points for one chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmScale {
    /// Data units per point along x
    pub x_per_point: f64,
    /// Data units per point along y
    pub y_per_point: f64,
    /// Marker diameter in points
    pub point_size: f64,
}

impl SwarmScale {
    /// Scale for a plot of `size` points showing `x_span` by `y_span` data units
    pub fn new(size: (f64, f64), x_span: f64, y_span: f64, point_size: f64) -> Self {
        Self {
            x_per_point: x_span / size.0,
            y_per_point: y_span / size.1,
            point_size,
        }
    }
}

/// x positions for `values` swarmed around `centre`, in input order
pub fn beeswarm(values: &[f64], centre: f64, scale: &SwarmScale) -> Vec<f64> {
    let d = scale.point_size;
    if values.is_empty() || !(d > 0.0) || !(scale.y_per_point > 0.0) {
        return vec![centre; values.len()];
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    // (offset, y) in points for each placed marker
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(values.len());
    let mut offsets = vec![0.0; values.len()];

    for idx in order {
        let y = values[idx] / scale.y_per_point;
        // Sorted by y, so only the tail of `placed` can be within reach
        let near: Vec<(f64, f64)> = placed
            .iter()
            .rev()
            .take_while(|(_, py)| (y - py).abs() < d)
            .copied()
            .collect();

        let offset = candidate_offsets(d)
            .find(|&x| near.iter().all(|&(px, py)| clears(x - px, y - py, d)))
            .unwrap_or(0.0);

        placed.push((offset, y));
        offsets[idx] = offset;
    }

    let mut xs: Vec<f64> = offsets.iter().map(|o| o * scale.x_per_point).collect();
    let widest = xs.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if widest > MAX_HALF_WIDTH {
        warn!(
            points = values.len(),
            widest,
            "swarm wider than its slot, squeezing; consider a smaller point_size"
        );
        let factor = MAX_HALF_WIDTH / widest;
        xs.iter_mut().for_each(|x| *x *= factor);
    }

    xs.into_iter().map(|x| centre + x).collect()
}

/// 0, +d, -d, +2d, -2d, ...
fn candidate_offsets(d: f64) -> impl Iterator<Item = f64> {
    std::iter::once(0.0).chain((1..).flat_map(move |k| {
        let step = k as f64 * d;
        [step, -step]
    }))
}

fn clears(dx: f64, dy: f64, d: f64) -> bool {
    dx * dx + dy * dy >= d * d * (1.0 - 1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_scale() -> SwarmScale {
        // One data unit per point on both axes
        SwarmScale {
            x_per_point: 1.0,
            y_per_point: 1.0,
            point_size: 1.0,
        }
    }

    #[test]
    fn test_spread_points_stay_centred() {
        let xs = beeswarm(&[0.0, 5.0, 10.0], 2.0, &unit_scale());
        assert_eq!(xs, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_ties_alternate_sides() {
        let scale = SwarmScale {
            x_per_point: 0.01,
            ..unit_scale()
        };
        let xs = beeswarm(&[1.0, 1.0, 1.0], 0.0, &scale);
        assert!((xs[0] - 0.0).abs() < 1e-12);
        assert!((xs[1] - 0.01).abs() < 1e-12);
        assert!((xs[2] + 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap() {
        let values: Vec<f64> = (0..40).map(|i| (i % 7) as f64 * 0.3).collect();
        let scale = SwarmScale {
            x_per_point: 0.001,
            ..unit_scale()
        };
        let xs = beeswarm(&values, 0.0, &scale);
        for i in 0..values.len() {
            for j in i + 1..values.len() {
                let dx = (xs[i] - xs[j]) / scale.x_per_point;
                let dy = values[i] - values[j];
                assert!(dx * dx + dy * dy >= 1.0 - 1e-6, "{i} and {j} overlap");
            }
        }
    }

    #[test]
    fn test_wide_swarm_is_squeezed() {
        let xs = beeswarm(&[0.0; 30], 1.0, &unit_scale());
        assert!(xs.iter().all(|x| (x - 1.0).abs() <= MAX_HALF_WIDTH + 1e-12));
    }
}
