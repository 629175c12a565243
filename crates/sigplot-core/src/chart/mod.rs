//! Chart builders
//!
//! Group charts (box, violin, half-violin) share one pipeline:
//!
//! 1. The chart kind draws its per-group bodies and points.
//! 2. The initial y range is autoscaled from what was drawn.
//! 3. [`SignificanceAnnotator`] lays out one bracket per group pair above
//!    that range.
//! 4. Reference line, ticks, labels and the final y limits are added.
//!
//! Radar charts compare profiles rather than samples and skip the
//! annotation step.

pub mod box_swarm;
pub mod glyphs;
pub mod half_violin;
pub mod radar;
pub mod violin;

pub use radar::{RadarChart, RadarSeries};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotate::{AnnotationPlan, RankSumTest, SignificanceAnnotator, WilcoxonRankSum};
use crate::axis::{calculate_ticks, AxisRange, TickMark};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::figure::Figure;
use crate::group::{data_max, validate_groups, Group};
use crate::palette::Color;
use crate::render::{z, Frame, HAlign, LineStyle, Primitive, Surface, VAlign};
use crate::swarm::SwarmScale;

/// Font size of significance labels, in points
pub const ANNOTATION_FONT_SIZE: f64 = 14.0;

/// Line width of significance brackets
pub const BRACKET_WIDTH: f64 = 1.5;

/// Kinds of group chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Box plot with a beeswarm overlay
    BoxSwarm,
    /// Mirrored KDE violins with an inner box and optional swarm
    Violin,
    /// Half-violin, offset box and jittered points side by side
    HalfViolinBoxSwarm,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::BoxSwarm => "box_swarm",
            ChartKind::Violin => "violin",
            ChartKind::HalfViolinBoxSwarm => "half_violin_box_swarm",
        }
    }

    /// Horizontal extent for `n` groups
    pub fn x_range(&self, n: usize, bias: f64) -> AxisRange {
        let n = n as f64;
        match self {
            ChartKind::HalfViolinBoxSwarm => {
                AxisRange::new(-0.5 - bias / 2.0, n - 0.5 + bias / 2.0)
            }
            ChartKind::BoxSwarm | ChartKind::Violin => AxisRange::new(-0.5, n - 0.5),
        }
    }

    /// Opacity of the horizontal reference line
    pub fn reference_alpha(&self) -> f32 {
        match self {
            ChartKind::HalfViolinBoxSwarm => 0.5,
            ChartKind::BoxSwarm | ChartKind::Violin => 0.75,
        }
    }

    fn body(
        &self,
        groups: &[Group],
        config: &ChartConfig,
        scale: &SwarmScale,
    ) -> Result<Vec<Primitive>> {
        match self {
            ChartKind::BoxSwarm => box_swarm::body(groups, config, scale),
            ChartKind::Violin => violin::body(groups, config, scale),
            ChartKind::HalfViolinBoxSwarm => half_violin::body(groups, config),
        }
    }
}

/// A group chart ready to be built
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupChart {
    pub kind: ChartKind,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub config: ChartConfig,
}

impl GroupChart {
    pub fn new(kind: ChartKind, groups: Vec<Group>) -> Self {
        Self {
            kind,
            groups,
            config: ChartConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the figure using the Wilcoxon rank-sum test
    pub fn build(&self) -> Result<Figure> {
        self.build_with(WilcoxonRankSum)
    }

    /// Build the figure with a custom p-value source
    pub fn build_with<T: RankSumTest>(&self, test: T) -> Result<Figure> {
        let groups = &self.groups;
        let config = &self.config;
        config.validate()?;
        validate_groups(groups)?;

        let n = groups.len();
        let x_range = self.kind.x_range(n, config.bias);
        let data_range = AxisRange::autoscale_values(sample_values(groups))
            .unwrap_or_else(|| AxisRange::new(0.0, 1.0));
        let scale = SwarmScale::new(
            config.figure_size,
            x_range.span(),
            data_range.span(),
            config.point_size,
        );

        let mut primitives = self.kind.body(groups, config, &scale)?;

        let initial = AxisRange::autoscale_values(primitives.iter().flat_map(Primitive::y_values))
            .unwrap_or(data_range);
        let top_sample = data_max(groups).unwrap_or(initial.max);

        let plan = if config.show_p_values {
            SignificanceAnnotator::with_test(test)
                .with_label_style(config.label_style)
                .compute_annotations(groups, &initial, top_sample)?
        } else {
            AnnotationPlan::empty(&initial)
        };
        primitives.extend(annotation_primitives(&plan));

        if let Some(y) = config.h_line {
            primitives.push(Primitive::HLine {
                y,
                style: LineStyle::solid(Color::GRAY.with_alpha(self.kind.reference_alpha()), 2.0),
                z: z::REFERENCE,
            });
        }

        let top = plan.final_top(config.y_max);
        let bottom = match config.y_min {
            Some(y_min) if y_min >= top => {
                warn!(y_min, top, "y_min is above the annotated top, using autoscaled minimum");
                initial.min
            }
            Some(y_min) => y_min,
            None => initial.min,
        };
        let y_range = AxisRange::new(bottom, top);
        let x_ticks = groups
            .iter()
            .enumerate()
            .map(|(i, g)| TickMark::new(i as f64, g.name.clone()))
            .collect();

        debug!(
            kind = self.kind.name(),
            groups = n,
            bands = plan.len(),
            y_min = y_range.min,
            y_max = y_range.max,
            "built group chart"
        );

        Ok(Figure {
            frame: Frame::Cartesian {
                x_range,
                y_range,
                x_ticks,
                y_ticks: calculate_ticks(&y_range, None),
                title: config.title.clone(),
                y_label: config.y_axis_label.clone(),
                y_grid: config.y_grid,
                font_scale: config.font_scale,
            },
            primitives,
            legend: Vec::new(),
            annotations: config.show_p_values.then_some(plan),
            initial_y_range: Some(initial),
        })
    }

    /// Build and draw onto `surface`
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<Figure> {
        let figure = self.build()?;
        figure.draw(surface);
        Ok(figure)
    }
}

/// Any chart this crate can build
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum Chart {
    Groups(GroupChart),
    Radar(RadarChart),
}

impl Chart {
    pub fn build(&self) -> Result<Figure> {
        match self {
            Chart::Groups(chart) => chart.build(),
            Chart::Radar(chart) => chart.build(),
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<Figure> {
        let figure = self.build()?;
        figure.draw(surface);
        Ok(figure)
    }
}

/// Bracket and label primitives for every band of `plan`
pub fn annotation_primitives(plan: &AnnotationPlan) -> Vec<Primitive> {
    plan.bands
        .iter()
        .flat_map(|band| {
            [
                Primitive::line(
                    band.bracket.polyline().to_vec(),
                    LineStyle::solid(Color::BLACK, BRACKET_WIDTH),
                    z::ANNOTATION,
                ),
                Primitive::Text {
                    x: band.label_x,
                    y: band.label_y,
                    content: band.label.clone(),
                    size: ANNOTATION_FONT_SIZE,
                    color: Color::BLACK,
                    halign: HAlign::Center,
                    valign: VAlign::Bottom,
                    z: z::ANNOTATION,
                },
            ]
        })
        .collect()
}

/// Log a group that has nothing to draw; its brackets are still laid out
pub(crate) fn skip_group(group: &Group) {
    warn!(group = %group.name, "group has no finite samples, drawing no body");
}

/// Finite samples of a group
pub(crate) fn finite(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|v| v.is_finite()).collect()
}

fn sample_values(groups: &[Group]) -> impl Iterator<Item = f64> + '_ {
    groups.iter().flat_map(|g| g.samples.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn groups() -> Vec<Group> {
        vec![
            Group::new("W", [4.1, 4.5, 3.9, 4.8, 5.0, 4.4]),
            Group::new("N2", [6.2, 5.9, 6.8, 7.1, 6.5, 6.0]),
            Group::new("N3", [9.0, 8.7, 9.4, 8.1, 9.9, 8.8]),
        ]
    }

    #[test]
    fn test_kinds_build_with_brackets() {
        for kind in [ChartKind::BoxSwarm, ChartKind::Violin, ChartKind::HalfViolinBoxSwarm] {
            let config = ChartConfig::new().with_jitter_seed(3);
            let figure = GroupChart::new(kind, groups()).with_config(config).build().unwrap();
            let plan = figure.annotations.as_ref().unwrap();
            assert_eq!(plan.len(), 3, "{kind:?}");

            let initial = figure.initial_y_range.unwrap();
            assert_eq!(plan.bands[0].bracket.y, initial.max);
            assert!(figure.y_range().unwrap().max > plan.bands[2].label_y);
        }
    }

    #[test]
    fn test_hidden_p_values_keep_autoscale() {
        let config = ChartConfig::new().with_p_values(false);
        let figure = GroupChart::new(ChartKind::BoxSwarm, groups())
            .with_config(config)
            .build()
            .unwrap();
        assert!(figure.annotations.is_none());
        assert_eq!(figure.y_range(), figure.initial_y_range);
    }

    #[test]
    fn test_y_limits_and_reference_line() {
        let config = ChartConfig::new()
            .with_y_limits(Some(0.0), Some(50.0))
            .with_h_line(5.0);
        let figure = GroupChart::new(ChartKind::Violin, groups())
            .with_config(config)
            .build()
            .unwrap();

        let y = figure.y_range().unwrap();
        assert_eq!(y.min, 0.0);
        let h_last = figure.annotations.as_ref().unwrap().h_last;
        assert!((y.max - (50.0 + 6.0 * h_last)).abs() < 1e-9);
        let reference = figure.primitives.iter().find_map(|p| match p {
            Primitive::HLine { y, z, .. } => Some((*y, *z)),
            _ => None,
        });
        assert_eq!(reference, Some((5.0, z::REFERENCE)));
    }

    #[test]
    fn test_render_draws_labels_last() {
        let mut surface = RecordingSurface::new();
        GroupChart::new(ChartKind::BoxSwarm, groups())
            .render(&mut surface)
            .unwrap();

        let last = surface.primitives.last().unwrap();
        assert_eq!(last.z(), z::ANNOTATION);
        assert_eq!(surface.texts().len(), 3);
    }

    #[test]
    fn test_single_group_rejected() {
        let err = GroupChart::new(ChartKind::Violin, vec![Group::new("only", [1.0, 2.0])])
            .build()
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_half_violin_x_range() {
        let r = ChartKind::HalfViolinBoxSwarm.x_range(3, 0.2);
        assert!((r.min + 0.6).abs() < 1e-12);
        assert!((r.max - 2.6).abs() < 1e-12);
    }
}
