//! Configuration for sigplot charts
//!
//! Every chart builder takes a config struct with sensible defaults. Configs
//! can be written by hand, or loaded from TOML/JSON.

use serde::{Deserialize, Serialize};

use crate::annotate::LabelStyle;
use crate::error::{PlotError, Result};
use crate::palette::PaletteSpec;

/// Settings shared by box, violin and half-violin charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart title
    pub title: String,
    /// Y-axis label
    pub y_axis_label: String,
    /// Lower y limit (None = autoscaled)
    pub y_min: Option<f64>,
    /// Minimum upper y limit; annotations may still raise it
    pub y_max: Option<f64>,
    /// Horizontal reference line
    pub h_line: Option<f64>,
    /// Multiplier for all text sizes
    pub font_scale: f64,
    /// Swarm/scatter marker diameter in points
    pub point_size: f64,
    /// Compute and draw pairwise significance brackets
    pub show_p_values: bool,
    /// Label text above each bracket
    pub label_style: LabelStyle,
    /// Horizontal grid lines at the y ticks
    pub y_grid: bool,
    /// Join the i-th samples of neighbouring groups (box charts only)
    pub connect_pairs: bool,
    /// Overlay individual samples (violin charts only)
    pub show_swarm: bool,
    /// Horizontal offset of half-violins and boxes from the group centre
    pub bias: f64,
    /// Seed for half-violin point jitter (None = fresh entropy each build)
    pub jitter_seed: Option<u64>,
    /// Nominal figure size in points, used to keep swarm markers apart
    pub figure_size: (f64, f64),
    pub box_palette: PaletteSpec,
    pub swarm_palette: PaletteSpec,
    pub violin_palette: PaletteSpec,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Title?".to_string(),
            y_axis_label: "Y-axis label?".to_string(),
            y_min: None,
            y_max: None,
            h_line: None,
            font_scale: 1.4,
            point_size: 6.0,
            show_p_values: true,
            label_style: LabelStyle::default(),
            y_grid: false,
            connect_pairs: false,
            show_swarm: true,
            bias: 0.2,
            jitter_seed: None,
            figure_size: (640.0, 480.0),
            box_palette: PaletteSpec::Default,
            swarm_palette: PaletteSpec::Default,
            violin_palette: PaletteSpec::Default,
        }
    }
}

impl ChartConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_axis_label = label.into();
        self
    }

    pub fn with_y_limits(mut self, y_min: Option<f64>, y_max: Option<f64>) -> Self {
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    pub fn with_h_line(mut self, y: f64) -> Self {
        self.h_line = Some(y);
        self
    }

    pub fn with_p_values(mut self, show: bool) -> Self {
        self.show_p_values = show;
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    pub fn with_grid(mut self) -> Self {
        self.y_grid = true;
        self
    }

    pub fn with_connected_pairs(mut self) -> Self {
        self.connect_pairs = true;
        self
    }

    pub fn with_swarm(mut self, show: bool) -> Self {
        self.show_swarm = show;
        self
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    pub fn with_palettes(mut self, body: PaletteSpec, points: PaletteSpec) -> Self {
        self.box_palette = body.clone();
        self.violin_palette = body;
        self.swarm_palette = points;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PlotError::Config(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| PlotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.font_scale > 0.0) {
            return Err(PlotError::Config("font_scale must be positive".to_string()));
        }
        if !(self.point_size > 0.0) {
            return Err(PlotError::Config("point_size must be positive".to_string()));
        }
        if !(0.0..0.5).contains(&self.bias) {
            return Err(PlotError::Config(
                "bias must be in [0.0, 0.5)".to_string(),
            ));
        }
        if let (Some(lo), Some(hi)) = (self.y_min, self.y_max) {
            if lo >= hi {
                return Err(PlotError::Config(
                    "y_min must be below y_max".to_string(),
                ));
            }
        }
        let (w, h) = self.figure_size;
        if !(w > 0.0 && h > 0.0) {
            return Err(PlotError::Config("figure_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Settings for radar charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub title: String,
    /// Line colors, cycled over groups (Default = tab10)
    pub colors: PaletteSpec,
    /// Vertex marker diameter in points
    pub marker_size: f64,
    pub line_width: f64,
    /// Opacity of each group's filled area
    pub fill_alpha: f32,
    /// Number of radial ticks from 0 to the maximum value
    pub radial_ticks: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            title: "Radar Chart".to_string(),
            colors: PaletteSpec::Default,
            marker_size: 6.0,
            line_width: 2.0,
            fill_alpha: 0.1,
            radial_ticks: 5,
        }
    }
}

impl RadarConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_colors(mut self, colors: PaletteSpec) -> Self {
        self.colors = colors;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}
