//! Drawing primitives and rendering sinks
//!
//! Chart builders emit a flat list of [`Primitive`]s in data coordinates.
//! A [`Surface`] consumes them; what it does with them (record, rasterize,
//! write SVG) is up to the implementation.

use serde::{Deserialize, Serialize};

use crate::axis::{AxisRange, TickMark};
use crate::palette::Color;

/// Stroke settings for lines and outlines
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    /// Width in points
    pub width: f64,
    pub dashed: bool,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

/// Horizontal text alignment relative to the anchor point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Draw order layers, lowest first
pub mod z {
    pub const REFERENCE: i32 = 0;
    pub const BODY: i32 = 1;
    pub const LINES: i32 = 2;
    /// Inner box drawn over a violin's swarm
    pub const INNER: i32 = 5;
    pub const POINTS: i32 = 10;
    pub const ANNOTATION: i32 = 20;
}

/// A single drawable element in data coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Open polyline
    Polyline {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        z: i32,
    },
    /// Closed, filled shape
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Color,
        stroke: Option<LineStyle>,
        z: i32,
    },
    /// Axis-aligned rectangle anchored at its lower-left corner
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Color,
        stroke: Option<LineStyle>,
        z: i32,
    },
    /// Circular marker; `size` is the diameter in points
    Marker {
        x: f64,
        y: f64,
        size: f64,
        fill: Color,
        z: i32,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        /// Font size in points
        size: f64,
        color: Color,
        halign: HAlign,
        valign: VAlign,
        z: i32,
    },
    /// Horizontal line spanning the full x range
    HLine { y: f64, style: LineStyle, z: i32 },
}

impl Primitive {
    pub fn z(&self) -> i32 {
        match self {
            Primitive::Polyline { z, .. }
            | Primitive::Polygon { z, .. }
            | Primitive::Rect { z, .. }
            | Primitive::Marker { z, .. }
            | Primitive::Text { z, .. }
            | Primitive::HLine { z, .. } => *z,
        }
    }

    /// Data-space y values this primitive occupies (for autoscaling)
    pub fn y_values(&self) -> Vec<f64> {
        match self {
            Primitive::Polyline { points, .. } | Primitive::Polygon { points, .. } => {
                points.iter().map(|p| p.1).collect()
            }
            Primitive::Rect { y, height, .. } => vec![*y, y + height],
            Primitive::Marker { y, .. } => vec![*y],
            Primitive::Text { .. } | Primitive::HLine { .. } => Vec::new(),
        }
    }

    /// Open line through `points`
    pub fn line(points: Vec<(f64, f64)>, style: LineStyle, z: i32) -> Self {
        Primitive::Polyline { points, style, z }
    }
}

/// Where to anchor a spoke label on a radar chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spoke {
    /// Angle in radians, counter-clockwise from the positive x axis
    pub angle: f64,
    pub label: String,
    pub halign: HAlign,
}

/// Coordinate frame and decorations of a figure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// Categorical x axis, numeric y axis
    Cartesian {
        x_range: AxisRange,
        y_range: AxisRange,
        x_ticks: Vec<TickMark>,
        y_ticks: Vec<TickMark>,
        title: String,
        y_label: String,
        y_grid: bool,
        font_scale: f64,
    },
    /// Radar/spider frame centred on the origin with radius `r_max`
    Polar {
        r_max: f64,
        spokes: Vec<Spoke>,
        r_ticks: Vec<TickMark>,
        /// Angle at which radial tick labels are placed, in radians
        r_label_angle: f64,
        title: String,
    },
}

impl Frame {
    pub fn title(&self) -> &str {
        match self {
            Frame::Cartesian { title, .. } | Frame::Polar { title, .. } => title,
        }
    }
}

/// Legend swatch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// A rendering sink
pub trait Surface {
    /// Called once before any primitive, with the figure's frame
    fn begin(&mut self, frame: &Frame);

    /// Draw one primitive; called in ascending z order
    fn draw(&mut self, primitive: &Primitive);

    /// Draw the legend, if the figure has one
    fn legend(&mut self, _entries: &[LegendEntry]) {}

    /// Called once after everything has been drawn
    fn finish(&mut self) {}
}

/// Surface that simply keeps what it was given
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub frame: Option<Frame>,
    pub primitives: Vec<Primitive>,
    pub legend: Vec<LegendEntry>,
    pub finished: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text primitives' contents, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, frame: &Frame) {
        self.frame = Some(frame.clone());
        self.primitives.clear();
        self.legend.clear();
        self.finished = false;
    }

    fn draw(&mut self, primitive: &Primitive) {
        self.primitives.push(primitive.clone());
    }

    fn legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
