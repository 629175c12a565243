//! Axis ranges, ticks and layout
//!
//! Provides autoscaled data ranges, tick mark calculation and label
//! formatting, plus the data-to-pixel transform used by rendering sinks.

use serde::{Deserialize, Serialize};

/// Fractional padding added on each side when autoscaling
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// A closed data interval along one axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range covering `[lo, hi]` padded by [`AUTOSCALE_MARGIN`] of the span
    /// on each side. A degenerate span is widened around its value.
    pub fn autoscale(lo: f64, hi: f64) -> Self {
        let span = hi - lo;
        if span > 0.0 {
            let pad = span * AUTOSCALE_MARGIN;
            return Self::new(lo - pad, hi + pad);
        }
        let half = if lo == 0.0 { 0.5 } else { lo.abs() * AUTOSCALE_MARGIN };
        Self::new(lo - half, hi + half)
    }

    /// Autoscale over an iterator of values; `None` when nothing is finite
    pub fn autoscale_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        (lo <= hi).then(|| Self::autoscale(lo, hi))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `v` within the range (0.0 at min, 1.0 at max)
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return 0.5;
        }
        (v - self.min) / span
    }
}

/// A tick mark on an axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    /// Position in data coordinates
    pub value: f64,

    /// Label text
    pub label: String,
}

impl TickMark {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Roughly five "nice" ticks (steps of 1, 2, 5 × 10ⁿ) inside `range`
pub fn calculate_ticks(range: &AxisRange, format: Option<&str>) -> Vec<TickMark> {
    let span = range.span();
    if !(span > 0.0) || !span.is_finite() {
        return vec![];
    }

    // Calculate nice tick spacing
    let rough_step = span / 5.0;
    let magnitude = 10.0_f64.powf(rough_step.log10().floor());
    let residual = rough_step / magnitude;

    let nice_step = if residual <= 1.5 {
        1.0 * magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let start = (range.min / nice_step).ceil() as i64;
    let end = (range.max / nice_step + 1e-9).floor() as i64;

    (start..=end)
        .map(|k| {
            // Snap tiny float residue (e.g. 0.30000000000000004) to zero
            let value = k as f64 * nice_step;
            let value = if value.abs() < nice_step * 1e-9 { 0.0 } else { value };
            TickMark::new(value, format_number(value, format))
        })
        .collect()
}

/// `count` evenly spaced ticks from `lo` to `hi` inclusive
pub fn linspace_ticks(lo: f64, hi: f64, count: usize, format: Option<&str>) -> Vec<TickMark> {
    match count {
        0 => vec![],
        1 => vec![TickMark::new(lo, format_number(lo, format))],
        n => (0..n)
            .map(|i| {
                let v = lo + (hi - lo) * i as f64 / (n - 1) as f64;
                TickMark::new(v, format_number(v, format))
            })
            .collect(),
    }
}

/// Format a number for display
///
/// `format` follows a small subset of printf-style specs: `".Nf"` or `".N"`
/// for fixed precision, anything ending in `e` for scientific.
pub fn format_number(value: f64, format: Option<&str>) -> String {
    match format {
        Some(fmt) if fmt.ends_with('e') || fmt.ends_with('E') => {
            format!("{:e}", value)
        }
        Some(fmt) if fmt.contains('.') => {
            let precision: usize = fmt
                .chars()
                .skip_while(|c| *c != '.')
                .skip(1)
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse()
                .unwrap_or(2);
            format!("{:.prec$}", value, prec = precision)
        }
        _ => {
            // Auto format
            if value == 0.0 {
                "0".to_string()
            } else if value.abs() >= 10000.0 || value.abs() < 0.01 {
                format!("{:.2e}", value)
            } else if value.fract().abs() < 1e-10 {
                format!("{:.0}", value)
            } else {
                let s = format!("{:.2}", value);
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
    }
}

/// Pixel layout of a plot area inside a canvas
#[derive(Clone, Debug)]
pub struct AxisLayout {
    /// Canvas size in pixels (width, height)
    pub viewport: [f64; 2],

    /// Margin for axis labels and ticks (left, bottom, right, top)
    pub margin: [f64; 4],

    /// Plot area in pixels (x, y, width, height), y measured from the top
    pub plot_area: [f64; 4],

    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl AxisLayout {
    /// Create a new axis layout with default margins
    pub fn new(width: f64, height: f64, x_range: AxisRange, y_range: AxisRange) -> Self {
        Self::with_margin(width, height, [70.0, 50.0, 20.0, 40.0], x_range, y_range)
    }

    pub fn with_margin(
        width: f64,
        height: f64,
        margin: [f64; 4],
        x_range: AxisRange,
        y_range: AxisRange,
    ) -> Self {
        let plot_area = [
            margin[0],
            margin[3],
            (width - margin[0] - margin[2]).max(1.0),
            (height - margin[1] - margin[3]).max(1.0),
        ];

        Self {
            viewport: [width, height],
            margin,
            plot_area,
            x_range,
            y_range,
        }
    }

    /// Transform data coordinates to pixel coordinates
    pub fn data_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let x_norm = self.x_range.normalize(x);
        let y_norm = self.y_range.normalize(y);

        let px = self.plot_area[0] + x_norm * self.plot_area[2];
        let py = self.plot_area[1] + (1.0 - y_norm) * self.plot_area[3]; // Y is flipped

        (px, py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoscale_margin() {
        let r = AxisRange::autoscale(0.0, 10.0);
        assert!((r.min + 0.5).abs() < 1e-12);
        assert!((r.max - 10.5).abs() < 1e-12);

        let flat = AxisRange::autoscale(2.0, 2.0);
        assert!(flat.span() > 0.0);
        assert!(AxisRange::autoscale_values([f64::NAN]).is_none());
    }

    #[test]
    fn test_calculate_ticks() {
        let ticks = calculate_ticks(&AxisRange::new(0.0, 10.0), None);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks[1].label, "2");

        assert!(calculate_ticks(&AxisRange::new(1.0, 1.0), None).is_empty());
    }

    #[test]
    fn test_linspace_ticks() {
        let ticks = linspace_ticks(0.0, 2.0, 5, Some(".2f"));
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.00", "0.50", "1.00", "1.50", "2.00"]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, None), "0");
        assert_eq!(format_number(123.0, None), "123");
        assert_eq!(format_number(0.5, None), "0.5");
        assert_eq!(format_number(1.001, None), "1");
        assert_eq!(format_number(-2.999, None), "-3");
        assert_eq!(format_number(123.456, Some(".2f")), "123.46");
        assert!(format_number(12345678.0, None).contains('e'));
    }

    #[test]
    fn test_axis_layout_transform() {
        let layout = AxisLayout::new(
            400.0,
            300.0,
            AxisRange::new(0.0, 100.0),
            AxisRange::new(0.0, 100.0),
        );

        // Default margins: 70 left, 40 top, plot area 310 x 210
        let (px, py) = layout.data_to_pixel(50.0, 50.0);
        assert!((px - (70.0 + 155.0)).abs() < 1e-9);
        assert!((py - (40.0 + 105.0)).abs() < 1e-9);

        // Higher data values sit closer to the top of the canvas
        let (_, top) = layout.data_to_pixel(0.0, 100.0);
        assert!(top < py);
    }
}
