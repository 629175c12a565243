//! Built figures
//!
//! A [`Figure`] is the complete draw plan of one chart: its frame, the
//! primitives to draw, the legend, and (for group charts) the significance
//! plan the brackets were laid out from.

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotationPlan;
use crate::axis::AxisRange;
use crate::render::{Frame, LegendEntry, Primitive, Surface};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub frame: Frame,
    pub primitives: Vec<Primitive>,
    pub legend: Vec<LegendEntry>,
    /// Significance layout, when p-values were computed
    pub annotations: Option<AnnotationPlan>,
    /// Autoscaled y range before annotations were stacked on top
    pub initial_y_range: Option<AxisRange>,
}

impl Figure {
    /// Send the figure to a rendering sink, lowest z first.
    ///
    /// Primitives sharing a z value keep their insertion order.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.begin(&self.frame);

        let mut ordered: Vec<&Primitive> = self.primitives.iter().collect();
        ordered.sort_by_key(|p| p.z());
        for primitive in ordered {
            surface.draw(primitive);
        }

        if !self.legend.is_empty() {
            surface.legend(&self.legend);
        }
        surface.finish();
    }

    /// Final y range of a cartesian figure
    pub fn y_range(&self) -> Option<AxisRange> {
        match &self.frame {
            Frame::Cartesian { y_range, .. } => Some(*y_range),
            Frame::Polar { .. } => None,
        }
    }

    /// Serialize the draw plan as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;
    use crate::render::{z, LineStyle, RecordingSurface};

    fn frame() -> Frame {
        Frame::Polar {
            r_max: 1.0,
            spokes: Vec::new(),
            r_ticks: Vec::new(),
            r_label_angle: 0.0,
            title: "t".into(),
        }
    }

    #[test]
    fn test_draw_sorts_by_z() {
        let line = |y: f64, z: i32| Primitive::HLine {
            y,
            style: LineStyle::solid(Color::BLACK, 1.0),
            z,
        };
        let figure = Figure {
            frame: frame(),
            primitives: vec![
                line(1.0, z::ANNOTATION),
                line(2.0, z::REFERENCE),
                line(3.0, z::REFERENCE),
            ],
            legend: Vec::new(),
            annotations: None,
            initial_y_range: None,
        };

        let mut surface = RecordingSurface::new();
        figure.draw(&mut surface);

        let ys: Vec<f64> = surface
            .primitives
            .iter()
            .map(|p| match p {
                Primitive::HLine { y, .. } => *y,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(ys, vec![2.0, 3.0, 1.0]);
        assert!(surface.finished);
        assert_eq!(surface.frame.unwrap().title(), "t");
    }
}
