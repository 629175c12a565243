//! sigplot-core - Comparative statistical figures with significance brackets
//!
//! This crate builds box, violin, half-violin and radar charts from
//! in-memory samples and annotates group charts with pairwise rank-sum
//! significance brackets.
//!
//! # Key Components
//!
//! - **SignificanceAnnotator**: pairwise tests, tiers and stacked bracket layout
//! - **GroupChart / RadarChart**: chart builders producing a [`Figure`]
//! - **Figure**: a backend-neutral draw plan of [`Primitive`]s
//! - **Surface**: rendering sink trait, with recording and SVG implementations
//! - **PaletteSpec**: default, named or explicit per-group colors
//!
//! # Example
//!
//! ```
//! use sigplot_core::{ChartKind, Group, GroupChart, RecordingSurface};
//!
//! let groups = vec![
//!     Group::new("W", [4.1, 4.5, 3.9, 4.8, 5.0]),
//!     Group::new("N3", [9.0, 8.7, 9.4, 8.1, 9.9]),
//! ];
//! let mut surface = RecordingSurface::new();
//! let figure = GroupChart::new(ChartKind::BoxSwarm, groups)
//!     .render(&mut surface)
//!     .unwrap();
//! assert_eq!(figure.annotations.unwrap().len(), 1);
//! ```

pub mod annotate;
pub mod axis;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod figure;
pub mod group;
pub mod jitter;
pub mod palette;
pub mod render;
pub mod swarm;

pub use annotate::*;
pub use axis::*;
pub use chart::{Chart, ChartKind, GroupChart, RadarChart, RadarSeries};
pub use config::{ChartConfig, RadarConfig};
pub use error::{PaletteError, PlotError, Result};
pub use export::{SvgConfig, SvgSurface};
pub use figure::Figure;
pub use group::*;
pub use palette::*;
pub use render::{
    Frame, HAlign, LegendEntry, LineStyle, Primitive, RecordingSurface, Spoke, Surface, VAlign,
};
