//! Violin plots with an inner box and optional swarm

use sigplot_stats::BoxStats;

use super::{finite, skip_group};
use super::glyphs::{inner_box, markers, violin_outline, ViolinSide, DARK_GRAY};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::group::Group;
use crate::palette::resolve_palette;
use crate::render::{z, LineStyle, Primitive};
use crate::swarm::{beeswarm, SwarmScale};

/// Full violin width in x units
pub const VIOLIN_WIDTH: f64 = 0.8;

/// Bandwidths the outline extends past the data
pub const VIOLIN_CUT: f64 = 2.0;

pub(crate) fn body(
    groups: &[Group],
    config: &ChartConfig,
    scale: &SwarmScale,
) -> Result<Vec<Primitive>> {
    let n = groups.len();
    let violin_colors = resolve_palette(&config.violin_palette, n)?;
    let swarm_colors = if config.show_swarm {
        resolve_palette(&config.swarm_palette, n)?
    } else {
        Vec::new()
    };
    let alpha = if config.show_swarm { 0.6 } else { 1.0 };

    let mut out = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let centre = i as f64;
        let values = finite(&group.samples);
        if values.is_empty() {
            skip_group(group);
            continue;
        }
        out.push(Primitive::Polygon {
            points: violin_outline(
                &values,
                centre,
                VIOLIN_WIDTH / 2.0,
                VIOLIN_CUT,
                ViolinSide::Both,
            )?,
            fill: violin_colors[i].with_alpha(alpha),
            stroke: Some(LineStyle::solid(DARK_GRAY, 1.5)),
            z: z::BODY,
        });

        if config.show_swarm {
            let xs = beeswarm(&values, centre, scale);
            // Between the violin body and the inner box
            out.extend(markers(&xs, &values, config.point_size, swarm_colors[i], z::LINES));
        }

        let stats = BoxStats::from_data(&values)?;
        out.extend(inner_box(&stats, centre, config.point_size));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteSpec;

    fn groups() -> Vec<Group> {
        vec![
            Group::new("a", [1.0, 2.0, 2.2, 3.0]),
            Group::new("b", [2.0, 3.5, 3.6, 5.0]),
        ]
    }

    #[test]
    fn test_swarm_toggles_alpha_and_points() {
        let scale = SwarmScale::new((640.0, 480.0), 2.0, 5.0, 6.0);

        let with = body(&groups(), &ChartConfig::default(), &scale).unwrap();
        let without = body(&groups(), &ChartConfig::new().with_swarm(false), &scale).unwrap();

        let swarm = |ps: &[Primitive]| {
            ps.iter()
                .filter(|p| matches!(p, Primitive::Marker { z, .. } if *z == z::LINES))
                .count()
        };
        assert_eq!(swarm(&with), 8);
        assert_eq!(swarm(&without), 0);

        let fill_alpha = |ps: &[Primitive]| match &ps[0] {
            Primitive::Polygon { fill, .. } => fill.a,
            _ => f32::NAN,
        };
        assert!((fill_alpha(&with) - 0.6).abs() < 1e-6);
        assert_eq!(fill_alpha(&without), 1.0);
    }

    #[test]
    fn test_short_palette_rejected() {
        let config = ChartConfig {
            violin_palette: PaletteSpec::explicit(&["#FF0000"]).unwrap(),
            ..ChartConfig::default()
        };
        let scale = SwarmScale::new((640.0, 480.0), 2.0, 5.0, 6.0);
        assert!(body(&groups(), &config, &scale).is_err());
    }
}
