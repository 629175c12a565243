//! Per-group building blocks shared by the chart kinds

use sigplot_stats::{BoxStats, GaussianKde, StatsError};

use crate::error::Result;
use crate::palette::Color;
use crate::render::{z, LineStyle, Primitive};

/// Grid points along a violin's value axis
pub const VIOLIN_GRIDSIZE: usize = 100;

/// Edge color of boxes and whiskers
pub const EDGE: Color = Color::BLACK;

/// Neutral dark gray for violin edges and inner boxes
pub const DARK_GRAY: Color = Color::rgb(0.26, 0.26, 0.26);

/// Which side(s) of the centre line a violin occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolinSide {
    Both,
    Right,
}

/// Closed KDE outline for one group.
///
/// The widest point reaches `half_width` from `centre`. `cut` extends the
/// support past the data in bandwidths. A sample with no spread becomes a
/// flat sliver at its value.
pub fn violin_outline(
    samples: &[f64],
    centre: f64,
    half_width: f64,
    cut: f64,
    side: ViolinSide,
) -> Result<Vec<(f64, f64)>> {
    let kde = match GaussianKde::new(samples) {
        Ok(kde) => kde,
        Err(StatsError::InvalidBandwidth(_)) => {
            let value = samples.iter().copied().find(|v| v.is_finite()).unwrap_or(0.0);
            let left = match side {
                ViolinSide::Both => centre - half_width,
                ViolinSide::Right => centre,
            };
            return Ok(vec![(left, value), (centre + half_width, value)]);
        }
        Err(e) => return Err(e.into()),
    };

    let grid = kde.density_grid(VIOLIN_GRIDSIZE, cut);
    let peak = grid.peak();
    let scale = if peak > 0.0 { half_width / peak } else { 0.0 };

    let right = grid
        .support
        .iter()
        .zip(&grid.density)
        .map(|(&y, &d)| (centre + d * scale, y));

    let mut outline: Vec<(f64, f64)> = right.collect();
    match side {
        ViolinSide::Both => {
            let left: Vec<(f64, f64)> = outline
                .iter()
                .rev()
                .map(|&(x, y)| (2.0 * centre - x, y))
                .collect();
            outline.extend(left);
        }
        ViolinSide::Right => {
            if let Some((lo, hi)) = grid.bounds() {
                outline.push((centre, hi));
                outline.push((centre, lo));
            }
        }
    }
    Ok(outline)
}

/// Styling of a Tukey box
#[derive(Clone, Copy, Debug)]
pub struct BoxStyle {
    pub fill: Color,
    /// Median line color
    pub median: Color,
    /// Draw the mean as a dashed gray line
    pub show_mean: bool,
}

/// Box, whiskers, caps, median and (optionally) mean line
pub fn box_glyph(stats: &BoxStats, centre: f64, width: f64, style: &BoxStyle) -> Vec<Primitive> {
    let half = width / 2.0;
    let cap = width / 4.0;
    let edge = LineStyle::solid(EDGE, 1.5);
    let across = |y: f64, style: LineStyle| {
        Primitive::line(vec![(centre - half, y), (centre + half, y)], style, z::LINES)
    };

    let mut out = vec![
        Primitive::Rect {
            x: centre - half,
            y: stats.q1,
            width,
            height: stats.q3 - stats.q1,
            fill: style.fill,
            stroke: Some(edge),
            z: z::BODY,
        },
        Primitive::line(vec![(centre, stats.q1), (centre, stats.whisker_low)], edge, z::LINES),
        Primitive::line(vec![(centre, stats.q3), (centre, stats.whisker_high)], edge, z::LINES),
        Primitive::line(
            vec![(centre - cap, stats.whisker_low), (centre + cap, stats.whisker_low)],
            edge,
            z::LINES,
        ),
        Primitive::line(
            vec![(centre - cap, stats.whisker_high), (centre + cap, stats.whisker_high)],
            edge,
            z::LINES,
        ),
        across(stats.median, LineStyle::solid(style.median, 2.0)),
    ];
    if style.show_mean {
        out.push(across(stats.mean, LineStyle::dashed(Color::GRAY, 2.0)));
    }
    out
}

/// Slim box drawn inside a violin: whisker line, IQR bar, white median dot
pub fn inner_box(stats: &BoxStats, centre: f64, point_size: f64) -> Vec<Primitive> {
    let bar = 0.03;
    vec![
        Primitive::line(
            vec![(centre, stats.whisker_low), (centre, stats.whisker_high)],
            LineStyle::solid(DARK_GRAY, 1.5),
            z::INNER,
        ),
        Primitive::Rect {
            x: centre - bar / 2.0,
            y: stats.q1,
            width: bar,
            height: stats.q3 - stats.q1,
            fill: DARK_GRAY,
            stroke: None,
            z: z::INNER,
        },
        Primitive::Marker {
            x: centre,
            y: stats.median,
            size: point_size * 0.75,
            fill: Color::WHITE,
            z: z::INNER + 1,
        },
    ]
}

/// One marker per (x, y) pair
pub fn markers(xs: &[f64], ys: &[f64], size: f64, fill: Color, z: i32) -> Vec<Primitive> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| Primitive::Marker { x, y, size, fill, z })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violin_outline_width() {
        let samples = [1.0, 2.0, 2.5, 3.0, 3.2, 4.0, 5.0];
        let outline = violin_outline(&samples, 1.0, 0.4, 2.0, ViolinSide::Both).unwrap();
        assert_eq!(outline.len(), 2 * VIOLIN_GRIDSIZE);

        let widest = outline.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        let narrowest = outline.iter().map(|p| p.0).fold(f64::MAX, f64::min);
        assert!((widest - 1.4).abs() < 1e-9);
        assert!((narrowest - 0.6).abs() < 1e-9);

        // Support extends below the data
        let lowest = outline.iter().map(|p| p.1).fold(f64::MAX, f64::min);
        assert!(lowest < 1.0);
    }

    #[test]
    fn test_half_violin_stays_right() {
        let samples = [0.5, 1.0, 1.1, 2.0];
        let outline = violin_outline(&samples, 3.0, 0.3, 0.0, ViolinSide::Right).unwrap();
        assert!(outline.iter().all(|p| p.0 >= 3.0));
        let lowest = outline.iter().map(|p| p.1).fold(f64::MAX, f64::min);
        assert!((lowest - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_constant_sample_is_a_sliver() {
        let outline = violin_outline(&[2.0, 2.0, 2.0], 0.0, 0.4, 2.0, ViolinSide::Both).unwrap();
        assert_eq!(outline, vec![(-0.4, 2.0), (0.4, 2.0)]);
    }

    #[test]
    fn test_box_glyph_parts() {
        let stats = BoxStats::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let style = BoxStyle {
            fill: Color::WHITE.with_alpha(0.5),
            median: Color::BLACK,
            show_mean: true,
        };
        let parts = box_glyph(&stats, 0.0, 0.8, &style);
        assert_eq!(parts.len(), 7);
        assert!(matches!(parts[0], Primitive::Rect { y, height, .. } if y == 2.0 && height == 2.0));
        assert!(matches!(&parts[6], Primitive::Polyline { style, .. } if style.dashed));
    }
}
