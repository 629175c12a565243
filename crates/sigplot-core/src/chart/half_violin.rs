//! Half-violin, box and jittered points side by side
//!
//! Each group gets three elements around its centre `i`: the right half of
//! a violin at `i + bias`, a narrow box just left of `i - bias`, and the raw
//! samples jittered around `i` itself.

use sigplot_stats::BoxStats;

use super::{finite, skip_group};
use super::glyphs::{box_glyph, markers, violin_outline, BoxStyle, ViolinSide};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::group::Group;
use crate::jitter::{Jitter, JITTER_SCALE};
use crate::palette::resolve_palette;
use crate::render::{z, Primitive};

/// Full width of the (unclipped) violin
pub const HALF_VIOLIN_WIDTH: f64 = 0.6;

/// Width of the offset box
pub const OFFSET_BOX_WIDTH: f64 = 0.25;

pub(crate) fn body(groups: &[Group], config: &ChartConfig) -> Result<Vec<Primitive>> {
    let n = groups.len();
    let violin_colors = resolve_palette(&config.violin_palette, n)?;
    let box_colors = resolve_palette(&config.box_palette, n)?;
    let swarm_colors = resolve_palette(&config.swarm_palette, n)?;
    let mut jitter = Jitter::new(JITTER_SCALE, config.jitter_seed)?;

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
                centre + config.bias,
                HALF_VIOLIN_WIDTH / 2.0,
                0.0,
                ViolinSide::Right,
            )?,
            fill: violin_colors[i].with_alpha(0.5),
            stroke: None,
            z: z::BODY,
        });

        let stats = BoxStats::from_data(&values)?;
        let style = BoxStyle {
            fill: box_colors[i].with_alpha(0.5),
            median: box_colors[i],
            show_mean: false,
        };
        let box_centre = centre - config.bias - OFFSET_BOX_WIDTH / 2.0;
        out.extend(box_glyph(&stats, box_centre, OFFSET_BOX_WIDTH, &style));

        let xs = jitter.positions(centre, values.len());
        out.extend(markers(
            &xs,
            &values,
            config.point_size,
            swarm_colors[i].with_alpha(0.9),
            z::POINTS,
        ));
    }
    Ok(out)
}
