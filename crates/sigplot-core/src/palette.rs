//! Color palettes for group-wise charts
//!
//! A chart needs exactly one color per group. Callers describe the colors
//! with a [`PaletteSpec`] and [`resolve_palette`] turns it into a
//! fixed-length list:
//! - Qualitative: deep (default), muted, pastel, bright, dark, colorblind, tab10
//! - Sequential/diverging: viridis, plasma, inferno, magma, coolwarm
//!
//! Qualitative palettes cycle when more colors are needed than they hold.
//! Sequential maps are sampled evenly, excluding their extreme ends, and can
//! be reversed with an `_r` suffix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidColor {
            value: hex.to_string(),
        };
        let digits = hex.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| -> Result<f32, PaletteError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| invalid())
        };

        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Convert to `#RRGGBB`, or `#RRGGBBAA` when not fully opaque
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GRAY
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// How a chart's per-group colors are chosen
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSpec {
    /// The default qualitative palette ("deep")
    #[default]
    Default,
    /// A built-in palette by name
    Named(String),
    /// Caller-supplied colors, one per group (extras ignored)
    Explicit(Vec<Color>),
}

impl PaletteSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Parse every entry as a hex color
    pub fn explicit<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        colors
            .iter()
            .map(|c| Color::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Explicit)
    }
}

/// Name of the palette used for [`PaletteSpec::Default`]
pub const DEFAULT_PALETTE: &str = "deep";

/// Resolve a palette spec to exactly `n` colors
pub fn resolve_palette(spec: &PaletteSpec, n: usize) -> Result<Vec<Color>, PaletteError> {
    match spec {
        PaletteSpec::Default => named_palette(DEFAULT_PALETTE, n),
        PaletteSpec::Named(name) => named_palette(name, n),
        PaletteSpec::Explicit(colors) => {
            if colors.len() < n {
                return Err(PaletteError::TooFewColors {
                    available: colors.len(),
                    required: n,
                });
            }
            Ok(colors[..n].to_vec())
        }
    }
}

/// `n` colors from a built-in palette
pub fn named_palette(name: &str, n: usize) -> Result<Vec<Color>, PaletteError> {
    let lower = name.trim().to_lowercase();

    if let Some(hexes) = qualitative_hexes(&lower) {
        return Ok(hexes
            .iter()
            .cycle()
            .take(n)
            .map(|h| hex_const(h))
            .collect());
    }

    let (base, reversed) = match lower.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lower.as_str(), false),
    };
    let cmap = get_colormap(base).ok_or_else(|| PaletteError::UnknownPalette {
        name: name.to_string(),
    })?;
    let cmap = if reversed { cmap.reversed() } else { cmap };

    // Evenly spaced interior samples: linspace(0, 1, n + 2)[1..=n]
    Ok((1..=n)
        .map(|i| cmap.sample(i as f32 / (n + 1) as f32))
        .collect())
}

/// Names accepted by [`named_palette`] (sequential maps also take `_r`)
pub fn builtin_palette_names() -> Vec<&'static str> {
    vec![
        "deep",
        "muted",
        "pastel",
        "bright",
        "dark",
        "colorblind",
        "tab10",
        "viridis",
        "plasma",
        "inferno",
        "magma",
        "coolwarm",
    ]
}

fn hex_const(hex: &str) -> Color {
    // Built-in tables are well-formed
    Color::from_hex(hex).unwrap_or_default()
}

fn qualitative_hexes(name: &str) -> Option<&'static [&'static str; 10]> {
    static DEEP: [&str; 10] = [
        "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B3", "#937860", "#DA8BC3", "#8C8C8C",
        "#CCB974", "#64B5CD",
    ];
    static MUTED: [&str; 10] = [
        "#4878D0", "#EE854A", "#6ACC64", "#D65F5F", "#956CB4", "#8C613C", "#DC7EC0", "#797979",
        "#D5BB67", "#82C6E2",
    ];
    static PASTEL: [&str; 10] = [
        "#A1C9F4", "#FFB482", "#8DE5A1", "#FF9F9B", "#D0BBFF", "#DEBB9B", "#FAB0E4", "#CFCFCF",
        "#FFFEA3", "#B9F2F0",
    ];
    static BRIGHT: [&str; 10] = [
        "#023EFF", "#FF7C00", "#1AC938", "#E8000B", "#8B2BE2", "#9F4800", "#F14CC1", "#A3A3A3",
        "#FFC400", "#00D7FF",
    ];
    static DARK: [&str; 10] = [
        "#001C7F", "#B1400D", "#12711C", "#8C0800", "#591E71", "#592F0D", "#A23582", "#3C3C3C",
        "#B8850A", "#006374",
    ];
    static COLORBLIND: [&str; 10] = [
        "#0173B2", "#DE8F05", "#029E73", "#D55E00", "#CC78BC", "#CA9161", "#FBAFE4", "#949494",
        "#ECE133", "#56B4E9",
    ];
    static TAB10: [&str; 10] = [
        "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
        "#BCBD22", "#17BECF",
    ];

    match name {
        "deep" => Some(&DEEP),
        "muted" => Some(&MUTED),
        "pastel" => Some(&PASTEL),
        "bright" => Some(&BRIGHT),
        "dark" => Some(&DARK),
        "colorblind" => Some(&COLORBLIND),
        "tab10" => Some(&TAB10),
        _ => None,
    }
}

/// A continuous colormap for sampling sequential palettes
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Color stops (positions from 0.0 to 1.0)
    stops: Vec<(f32, Color)>,
    /// Whether the colormap is reversed
    reversed: bool,
}

impl Colormap {
    /// Create a new colormap from a list of colors (evenly spaced)
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        let n = colors.len();
        let stops: Vec<(f32, Color)> = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / (n - 1).max(1) as f32, c))
            .collect();

        Self {
            name: name.into(),
            stops,
            reversed: false,
        }
    }

    /// Reverse the colormap
    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, mut t: f32) -> Color {
        t = t.clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }

        match self.stops.as_slice() {
            [] => return Color::default(),
            [(_, only)] => return *only,
            _ => {}
        }

        for pair in self.stops.windows(2) {
            let (t0, c0) = &pair[0];
            let (t1, c1) = &pair[1];

            if t >= *t0 && t <= *t1 {
                let local_t = (t - t0) / (t1 - t0);
                return Color::lerp(c0, c1, local_t);
            }
        }

        self.stops.last().map(|(_, c)| *c).unwrap_or_default()
    }
}

/// Get a built-in colormap by name
pub fn get_colormap(name: &str) -> Option<Colormap> {
    let colors: &[(f32, f32, f32)] = match name.to_lowercase().as_str() {
        "viridis" => &[
            (0.267, 0.005, 0.329),
            (0.282, 0.141, 0.458),
            (0.254, 0.265, 0.530),
            (0.207, 0.372, 0.553),
            (0.164, 0.471, 0.558),
            (0.128, 0.567, 0.551),
            (0.135, 0.659, 0.518),
            (0.267, 0.749, 0.441),
            (0.478, 0.821, 0.318),
            (0.741, 0.873, 0.150),
            (0.993, 0.906, 0.144),
        ],
        "plasma" => &[
            (0.050, 0.030, 0.528),
            (0.294, 0.012, 0.615),
            (0.494, 0.012, 0.658),
            (0.665, 0.138, 0.614),
            (0.798, 0.280, 0.470),
            (0.898, 0.396, 0.304),
            (0.973, 0.558, 0.154),
            (0.992, 0.748, 0.159),
            (0.940, 0.975, 0.131),
        ],
        "inferno" => &[
            (0.001, 0.000, 0.014),
            (0.133, 0.047, 0.263),
            (0.341, 0.063, 0.429),
            (0.550, 0.161, 0.506),
            (0.735, 0.216, 0.330),
            (0.878, 0.392, 0.102),
            (0.978, 0.557, 0.035),
            (0.992, 0.772, 0.247),
            (0.988, 0.998, 0.645),
        ],
        "magma" => &[
            (0.001, 0.000, 0.014),
            (0.116, 0.042, 0.232),
            (0.271, 0.051, 0.404),
            (0.461, 0.098, 0.495),
            (0.665, 0.176, 0.515),
            (0.844, 0.295, 0.461),
            (0.962, 0.507, 0.454),
            (0.992, 0.738, 0.600),
            (0.987, 0.991, 0.750),
        ],
        "coolwarm" => &[
            (0.230, 0.299, 0.754),
            (0.552, 0.691, 0.996),
            (0.865, 0.865, 0.865),
            (0.957, 0.647, 0.510),
            (0.706, 0.016, 0.150),
        ],
        _ => return None,
    };

    Some(Colormap::from_colors(
        name.to_lowercase(),
        colors.iter().map(|&(r, g, b)| Color::rgb(r, g, b)).collect(),
    ))
}
