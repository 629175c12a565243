//! Box plots with a beeswarm overlay

use sigplot_stats::BoxStats;
use tracing::warn;

use super::{finite, skip_group};
use super::glyphs::{box_glyph, markers, BoxStyle, DARK_GRAY};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::group::Group;
use crate::palette::{resolve_palette, Color};
use crate::render::{z, LineStyle, Primitive};
use crate::swarm::{beeswarm, SwarmScale};

/// Box width in x units
pub const BOX_WIDTH: f64 = 0.8;

pub(crate) fn body(
    groups: &[Group],
    config: &ChartConfig,
    scale: &SwarmScale,
) -> Result<Vec<Primitive>> {
    let n = groups.len();
    let box_colors = resolve_palette(&config.box_palette, n)?;
    let swarm_colors = resolve_palette(&config.swarm_palette, n)?;

    let mut out = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let centre = i as f64;
        let values = finite(&group.samples);
        if values.is_empty() {
            skip_group(group);
            continue;
        }
        let stats = BoxStats::from_data(&values)?;
        let style = BoxStyle {
            fill: box_colors[i].with_alpha(0.5),
            median: DARK_GRAY,
            show_mean: true,
        };
        out.extend(box_glyph(&stats, centre, BOX_WIDTH, &style));

        let xs = beeswarm(&values, centre, scale);
        out.extend(markers(&xs, &values, config.point_size, swarm_colors[i], z::POINTS));
    }

    if config.connect_pairs {
        out.extend(connect_pairs(groups));
    }
    Ok(out)
}

/// Lines joining the k-th sample of each group to the k-th sample of the
/// next group. Neighbours of different lengths are skipped with a warning.
pub fn connect_pairs(groups: &[Group]) -> Vec<Primitive> {
    let style = LineStyle::solid(Color::GRAY.with_alpha(0.4), 1.0);
    let mut out = Vec::new();

    for (i, pair) in groups.windows(2).enumerate() {
        let (left, right) = (&pair[0], &pair[1]);
        if left.len() != right.len() {
            warn!(
                left = %left.name,
                right = %right.name,
                "cannot connect pairs: groups have different lengths"
            );
            continue;
        }
        let (x0, x1) = (i as f64, (i + 1) as f64);
        out.extend(
            left.samples
                .iter()
                .zip(&right.samples)
                .map(|(&y0, &y1)| Primitive::line(vec![(x0, y0), (x1, y1)], style, z::LINES)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_pairs_skips_mismatched() {
        let groups = vec![
            Group::new("a", [1.0, 2.0]),
            Group::new("b", [3.0, 4.0]),
            Group::new("c", [5.0]),
        ];
        let lines = connect_pairs(&groups);
        assert_eq!(lines.len(), 2);
        assert!(matches!(
            &lines[1],
            Primitive::Polyline { points, .. } if points == &vec![(0.0, 2.0), (1.0, 4.0)]
        ));
    }

    #[test]
    fn test_body_has_box_and_points() {
        let groups = vec![Group::new("a", [1.0, 2.0, 3.0]), Group::new("b", [2.0, 3.0, 4.0])];
        let scale = SwarmScale::new((640.0, 480.0), 2.0, 4.0, 6.0);
        let prims = body(&groups, &ChartConfig::default(), &scale).unwrap();

        let rects = prims.iter().filter(|p| matches!(p, Primitive::Rect { .. })).count();
        let points = prims.iter().filter(|p| matches!(p, Primitive::Marker { .. })).count();
        assert_eq!(rects, 2);
        assert_eq!(points, 6);
    }
}
