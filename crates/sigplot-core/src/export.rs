//! SVG export
//!
//! [`SvgSurface`] renders a figure into an in-memory SVG document. Writing
//! the document anywhere is left to the caller.

use serde::{Deserialize, Serialize};

use crate::axis::{format_number, AxisLayout, AxisRange, TickMark};
use crate::chart::radar::SPOKE_LABEL_RADIUS;
use crate::figure::Figure;
use crate::palette::Color;
use crate::render::{Frame, HAlign, LegendEntry, LineStyle, Primitive, Spoke, Surface, VAlign};

/// Base font size for tick labels before `font_scale`
const TICK_FONT_SIZE: f64 = 10.0;

/// Placement and look of one text element
#[derive(Clone, Copy, Debug)]
struct TextStyle {
    size: f64,
    color: Color,
    halign: HAlign,
    valign: VAlign,
    /// Rotation in degrees about the anchor
    rotate: Option<f64>,
}

impl TextStyle {
    fn new(size: f64, halign: HAlign, valign: VAlign) -> Self {
        Self {
            size,
            color: Color::BLACK,
            halign,
            valign,
            rotate: None,
        }
    }

    fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// SVG output settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    /// Whether to draw the title above the plot
    pub include_title: bool,
    /// Leave the background unpainted
    pub transparent_background: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            include_title: true,
            transparent_background: false,
        }
    }
}

impl SvgConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Enable transparent background
    pub fn with_transparency(mut self) -> Self {
        self.transparent_background = true;
        self
    }
}

/// Surface producing an SVG document
#[derive(Debug, Clone)]
pub struct SvgSurface {
    config: SvgConfig,
    layout: AxisLayout,
    font_scale: f64,
    out: String,
}

impl SvgSurface {
    pub fn new(config: SvgConfig) -> Self {
        let unit = AxisRange::new(0.0, 1.0);
        Self {
            layout: AxisLayout::new(config.width, config.height, unit, unit),
            config,
            font_scale: 1.0,
            out: String::new(),
        }
    }

    /// The document written so far
    pub fn document(&self) -> &str {
        &self.out
    }

    pub fn into_document(self) -> String {
        self.out
    }

    fn px(&self, x: f64, y: f64) -> (f64, f64) {
        self.layout.data_to_pixel(x, y)
    }

    fn header(&mut self) {
        let (w, h) = (self.config.width, self.config.height);
        self.out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#
        ));
        self.out.push_str(&format!(r#"viewBox="0 0 {w} {h}">"#));
        self.out.push('\n');
        if !self.config.transparent_background {
            self.out
                .push_str(&format!(r#"<rect width="{w}" height="{h}" fill="white" />"#));
            self.out.push('\n');
        }
    }

    fn title(&mut self, title: &str) {
        if !self.config.include_title || title.is_empty() {
            return;
        }
        let x = self.config.width / 2.0;
        let y = self.layout.plot_area[1] / 2.0;
        let size = 12.0 * self.font_scale;
        self.text(x, y, title, TextStyle::new(size, HAlign::Center, VAlign::Center));
    }

    fn cartesian_axes(
        &mut self,
        x_ticks: &[TickMark],
        y_ticks: &[TickMark],
        y_label: &str,
        grid: bool,
    ) {
        let [left, top, width, height] = self.layout.plot_area;
        let bottom = top + height;
        let size = TICK_FONT_SIZE * self.font_scale;
        let y_tick_style = TextStyle::new(size, HAlign::Right, VAlign::Center);
        let x_tick_style = TextStyle::new(size, HAlign::Center, VAlign::Top);
        let axis = LineStyle::solid(Color::BLACK, 1.0);

        for tick in y_ticks {
            let (_, y) = self.px(0.0, tick.value);
            if grid {
                let style = LineStyle::solid(Color::rgb(0.8, 0.8, 0.8), 0.8);
                self.segment(left, y, left + width, y, &style);
            }
            self.segment(left - 4.0, y, left, y, &axis);
            self.text(left - 6.0, y, &tick.label, y_tick_style);
        }
        for tick in x_ticks {
            let (x, _) = self.px(tick.value, 0.0);
            self.segment(x, bottom, x, bottom + 4.0, &axis);
            self.text(x, bottom + 6.0, &tick.label, x_tick_style);
        }

        self.segment(left, top, left, bottom, &axis);
        self.segment(left, bottom, left + width, bottom, &axis);

        if !y_label.is_empty() {
            let x = left / 4.0;
            let y = top + height / 2.0;
            let style = TextStyle::new(size, HAlign::Center, VAlign::Center).rotated(-90.0);
            self.text(x, y, y_label, style);
        }
    }

    fn polar_axes(
        &mut self,
        r_max: f64,
        spokes: &[Spoke],
        r_ticks: &[TickMark],
        label_angle: f64,
    ) {
        let grid = LineStyle::solid(Color::rgb(0.8, 0.8, 0.8), 0.8);
        let (cx, cy) = self.px(0.0, 0.0);
        let size = TICK_FONT_SIZE * self.font_scale * 0.9;
        let tick_style = TextStyle::new(size, HAlign::Left, VAlign::Bottom).colored(Color::GRAY);

        for tick in r_ticks.iter().filter(|t| t.value > 0.0) {
            let (edge, _) = self.px(tick.value, 0.0);
            self.out.push_str(&format!(
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="none"{} />"#,
                edge - cx,
                stroke_attrs(&grid)
            ));
            self.out.push('\n');

            let (x, y) = self.px(tick.value * label_angle.cos(), tick.value * label_angle.sin());
            self.text(x, y, &tick.label, tick_style);
        }

        for spoke in spokes {
            let (x, y) = self.px(r_max * spoke.angle.cos(), r_max * spoke.angle.sin());
            self.segment(cx, cy, x, y, &grid);

            let r = r_max * SPOKE_LABEL_RADIUS;
            let (lx, ly) = self.px(r * spoke.angle.cos(), r * spoke.angle.sin());
            let style = TextStyle::new(12.0, spoke.halign, VAlign::Center);
            self.text(lx, ly, &spoke.label, style);
        }
    }

    fn segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.out.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"{} />"#,
            stroke_attrs(style)
        ));
        self.out.push('\n');
    }

    fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle) {
        let anchor = match style.halign {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        };
        let baseline = match style.valign {
            VAlign::Top => "hanging",
            VAlign::Center => "central",
            VAlign::Bottom => "alphabetic",
        };
        self.out.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="sans-serif" font-size="{:.1}"{}"#,
            style.size,
            fill_attrs(style.color)
        ));
        self.out.push_str(&format!(
            r#" text-anchor="{anchor}" dominant-baseline="{baseline}""#
        ));
        if let Some(angle) = style.rotate {
            self.out
                .push_str(&format!(r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#));
        }
        self.out.push('>');
        self.out.push_str(&escape_xml(content));
        self.out.push_str("</text>\n");
    }

    fn points_attr(&self, points: &[(f64, f64)]) -> String {
        points
            .iter()
            .map(|&(x, y)| {
                let (px, py) = self.px(x, y);
                format!("{px:.2},{py:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(SvgConfig::default())
    }
}

impl Surface for SvgSurface {
    fn begin(&mut self, frame: &Frame) {
        self.out.clear();
        let (w, h) = (self.config.width, self.config.height);

        match frame {
            Frame::Cartesian {
                x_range,
                y_range,
                x_ticks,
                y_ticks,
                title,
                y_label,
                y_grid,
                font_scale,
            } => {
                self.font_scale = *font_scale;
                self.layout = AxisLayout::new(w, h, *x_range, *y_range);
                self.header();
                self.title(title);
                self.cartesian_axes(x_ticks, y_ticks, y_label, *y_grid);
            }
            Frame::Polar {
                r_max,
                spokes,
                r_ticks,
                r_label_angle,
                title,
            } => {
                self.font_scale = 1.0;
                // Square plot area with room for spoke labels
                let side = (w.min(h) - 80.0).max(1.0);
                let (mx, my) = ((w - side) / 2.0, (h - side) / 2.0);
                let margin = [mx, my, mx, my];
                let extent = AxisRange::new(-r_max * 1.25, r_max * 1.25);
                self.layout = AxisLayout::with_margin(w, h, margin, extent, extent);
                self.header();
                self.title(title);
                self.polar_axes(*r_max, spokes, r_ticks, *r_label_angle);
            }
        }
    }

    fn draw(&mut self, primitive: &Primitive) {
        let element = match primitive {
            Primitive::Polyline { points, style, .. } => format!(
                r#"<polyline points="{}" fill="none"{}{} />"#,
                self.points_attr(points),
                stroke_attrs(style),
                dash_attr(style)
            ),
            Primitive::Polygon {
                points,
                fill,
                stroke,
                ..
            } => format!(
                r#"<polygon points="{}"{}{} />"#,
                self.points_attr(points),
                fill_attrs(*fill),
                stroke.as_ref().map(stroke_attrs).unwrap_or_default()
            ),
            Primitive::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
                ..
            } => {
                let (x0, y0) = self.px(*x, y + height);
                let (x1, y1) = self.px(x + width, *y);
                format!(
                    r#"<rect x="{x0:.2}" y="{y0:.2}" width="{:.2}" height="{:.2}"{}{} />"#,
                    (x1 - x0).abs(),
                    (y1 - y0).abs(),
                    fill_attrs(*fill),
                    stroke.as_ref().map(stroke_attrs).unwrap_or_default()
                )
            }
            Primitive::Marker { x, y, size, fill, .. } => {
                let (cx, cy) = self.px(*x, *y);
                format!(
                    r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}"{} />"#,
                    size / 2.0,
                    fill_attrs(*fill)
                )
            }
            Primitive::Text {
                x,
                y,
                content,
                size,
                color,
                halign,
                valign,
                ..
            } => {
                let (px, py) = self.px(*x, *y);
                let style = TextStyle::new(*size, *halign, *valign).colored(*color);
                self.text(px, py, content, style);
                return;
            }
            Primitive::HLine { y, style, .. } => {
                let [left, _, width, _] = self.layout.plot_area;
                let (_, py) = self.px(0.0, *y);
                self.segment(left, py, left + width, py, style);
                return;
            }
        };
        self.out.push_str(&element);
        self.out.push('\n');
    }

    fn legend(&mut self, entries: &[LegendEntry]) {
        let x = self.config.width - 110.0;
        let mut y = 20.0;
        let style = TextStyle::new(11.0, HAlign::Left, VAlign::Center);
        for entry in entries {
            self.out.push_str(&format!(
                r#"<rect x="{x:.2}" y="{:.2}" width="12" height="12"{} />"#,
                y - 6.0,
                fill_attrs(entry.color)
            ));
            self.out.push('\n');
            self.text(x + 18.0, y, &entry.label, style);
            y += 18.0;
        }
    }

    fn finish(&mut self) {
        self.out.push_str("</svg>\n");
    }
}

impl Figure {
    /// Render this figure as an SVG document
    pub fn to_svg(&self, config: SvgConfig) -> String {
        let mut surface = SvgSurface::new(config);
        self.draw(&mut surface);
        surface.into_document()
    }
}

fn fill_attrs(color: Color) -> String {
    let mut attrs = format!(r#" fill="{}""#, color.with_alpha(1.0).to_hex());
    if color.a < 1.0 {
        attrs.push_str(&format!(r#" fill-opacity="{:.3}""#, color.a));
    }
    attrs
}

fn stroke_attrs(style: &LineStyle) -> String {
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{:.2}""#,
        style.color.with_alpha(1.0).to_hex(),
        style.width
    );
    if style.color.a < 1.0 {
        attrs.push_str(&format!(r#" stroke-opacity="{:.3}""#, style.color.a));
    }
    attrs
}

fn dash_attr(style: &LineStyle) -> String {
    if style.dashed {
        let dash = format_number(style.width * 3.0, None);
        let gap = format_number(style.width * 2.0, None);
        format!(r#" stroke-dasharray="{dash},{gap}""#)
    } else {
        String::new()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, GroupChart, RadarChart, RadarSeries};
    use crate::config::ChartConfig;
    use crate::group::Group;

    #[test]
    fn test_group_chart_svg() {
        let groups = vec![
            Group::new("W", [1.0, 1.2, 1.4, 1.1, 0.9]),
            Group::new("N3 & REM", [3.0, 3.3, 2.9, 3.4, 3.1]),
        ];
        let figure = GroupChart::new(ChartKind::BoxSwarm, groups)
            .with_config(ChartConfig::new().with_title("Sleep").with_grid())
            .build()
            .unwrap();
        let svg = figure.to_svg(SvgConfig::default());

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(">Sleep</text>"));
        assert!(svg.contains("N3 &amp; REM"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_radar_svg_has_legend() {
        let chart = RadarChart::new(
            ["a", "b", "c"],
            vec![RadarSeries::new("one", [1.0, 2.0, 3.0])],
        );
        let mut surface = SvgSurface::new(SvgConfig::new(400.0, 400.0).with_transparency());
        chart.render(&mut surface).unwrap();

        let svg = surface.document();
        assert!(!svg.contains(r#"fill="white""#));
        assert!(svg.contains(">one</text>"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_fill_opacity() {
        assert_eq!(fill_attrs(Color::BLACK), r##" fill="#000000""##);
        assert!(fill_attrs(Color::BLACK.with_alpha(0.5)).contains(r#"fill-opacity="0.500""#));
    }
}
