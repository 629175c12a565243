//! Radar (spider) charts
//!
//! Each series is a closed polygon over `k` spokes at angles `2πj/k`,
//! measured counter-clockwise from the positive x axis. Points are emitted
//! in cartesian data coordinates centred on the origin.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axis::linspace_ticks;
use crate::config::RadarConfig;
use crate::error::{PaletteError, PlotError, Result};
use crate::figure::Figure;
use crate::palette::{named_palette, resolve_palette, Color, PaletteSpec};
use crate::render::{z, Frame, HAlign, LegendEntry, LineStyle, Primitive, Spoke, Surface};

/// Palette used when no colors are given
pub const RADAR_PALETTE: &str = "tab10";

/// Spoke labels sit this far outside the outer ring, relative to `r_max`
pub const SPOKE_LABEL_RADIUS: f64 = 1.05;

/// One profile drawn on the radar
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarSeries {
    pub label: String,
    /// One value per spoke
    pub values: Vec<f64>,
}

impl RadarSeries {
    pub fn new(label: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self {
            label: label.into(),
            values: values.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    /// Spoke labels, in drawing order
    pub axes: Vec<String>,
    pub series: Vec<RadarSeries>,
    #[serde(default)]
    pub config: RadarConfig,
}

impl RadarChart {
    pub fn new<I, S>(axes: I, series: Vec<RadarSeries>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            axes: axes.into_iter().map(Into::into).collect(),
            series,
            config: RadarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RadarConfig) -> Self {
        self.config = config;
        self
    }

    /// Check that every series has one value per spoke
    pub fn validate(&self) -> Result<()> {
        let k = self.axes.len();
        if k == 0 {
            return Err(PlotError::invalid("radar chart needs at least one axis"));
        }
        if self.series.is_empty() {
            return Err(PlotError::invalid("radar chart needs at least one series"));
        }
        for s in &self.series {
            if s.values.len() != k {
                return Err(PlotError::invalid(format!(
                    "series '{}' has {} values, but there are {} axes",
                    s.label,
                    s.values.len(),
                    k
                )));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Figure> {
        self.validate()?;
        let k = self.axes.len();
        let config = &self.config;

        let r_max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if !(r_max > 0.0) {
            return Err(PlotError::invalid("radar values must include a positive maximum"));
        }

        let colors = series_colors(&config.colors, self.series.len())?;
        let angles: Vec<f64> = (0..k).map(|j| spoke_angle(j, k)).collect();

        let mut primitives = Vec::new();
        let mut legend = Vec::with_capacity(self.series.len());
        for (series, &color) in self.series.iter().zip(&colors) {
            let points: Vec<(f64, f64)> = series
                .values
                .iter()
                .zip(&angles)
                .map(|(&r, &theta)| (r * theta.cos(), r * theta.sin()))
                .collect();

            primitives.push(Primitive::Polygon {
                points: points.clone(),
                fill: color.with_alpha(config.fill_alpha),
                stroke: None,
                z: z::BODY,
            });

            let mut ring = points.clone();
            if let Some(&first) = points.first() {
                ring.push(first);
            }
            primitives.push(Primitive::line(
                ring,
                LineStyle::solid(color, config.line_width),
                z::LINES,
            ));
            primitives.extend(points.iter().map(|&(x, y)| Primitive::Marker {
                x,
                y,
                size: config.marker_size,
                fill: color,
                z: z::POINTS,
            }));

            legend.push(LegendEntry {
                label: series.label.clone(),
                color,
            });
        }

        let spokes = self
            .axes
            .iter()
            .zip(&angles)
            .map(|(label, &angle)| Spoke {
                angle,
                label: label.clone(),
                halign: spoke_alignment(angle.to_degrees()),
            })
            .collect();

        debug!(axes = k, series = self.series.len(), r_max, "built radar chart");

        Ok(Figure {
            frame: Frame::Polar {
                r_max,
                spokes,
                r_ticks: linspace_ticks(0.0, r_max, config.radial_ticks, Some(".2f")),
                r_label_angle: PI / k as f64,
                title: config.title.clone(),
            },
            primitives,
            legend,
            annotations: None,
            initial_y_range: None,
        })
    }

    /// Build and draw onto `surface`
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<Figure> {
        let figure = self.build()?;
        figure.draw(surface);
        Ok(figure)
    }
}

/// Angle of spoke `j` of `k`, in radians
pub fn spoke_angle(j: usize, k: usize) -> f64 {
    2.0 * PI * j as f64 / k as f64
}

/// Label alignment that keeps spoke labels clear of the plot.
///
/// Labels on the left half are right-aligned, those on the right half
/// left-aligned, and labels near the vertical centred.
pub fn spoke_alignment(degrees: f64) -> HAlign {
    if degrees > 95.0 && degrees < 265.0 {
        HAlign::Right
    } else if degrees < 85.0 || degrees > 275.0 {
        HAlign::Left
    } else {
        HAlign::Center
    }
}

/// One color per series; explicit lists cycle rather than failing
fn series_colors(spec: &PaletteSpec, n: usize) -> Result<Vec<Color>> {
    let colors = match spec {
        PaletteSpec::Default => named_palette(RADAR_PALETTE, n)?,
        PaletteSpec::Explicit(list) if list.is_empty() => {
            return Err(PaletteError::TooFewColors {
                available: 0,
                required: n,
            }
            .into())
        }
        PaletteSpec::Explicit(list) => list.iter().copied().cycle().take(n).collect(),
        PaletteSpec::Named(_) => resolve_palette(spec, n)?,
    };
    Ok(colors)
}
