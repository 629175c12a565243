//! Error types for sigplot-core
//!
//! Provides error handling for:
//! - Group validation
//! - Palette resolution
//! - Configuration loading

use sigplot_stats::StatsError;
use thiserror::Error;

/// Main error type for sigplot operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Inputs that cannot be charted (too few groups, empty samples, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Palette resolution errors
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Statistical primitive failed
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),
}

/// Errors related to palettes and colors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// Explicit palette too short for the number of groups
    #[error("Palette has fewer colors ({available}) than number of groups ({required})")]
    TooFewColors { available: usize, required: usize },

    /// Named palette not known
    #[error("Unknown palette: {name}")]
    UnknownPalette { name: String },

    /// Color string could not be parsed
    #[error("Invalid color '{value}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor { value: String },
}

impl PlotError {
    /// Shorthand for `PlotError::InvalidInput`
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this error was caused by caller-supplied data
    pub fn is_input_error(&self) -> bool {
        matches!(self, PlotError::InvalidInput(_) | PlotError::Stats(_))
    }
}

impl From<toml::de::Error> for PlotError {
    fn from(err: toml::de::Error) -> Self {
        PlotError::Config(err.to_string())
    }
}

/// Result type for sigplot operations
pub type Result<T> = std::result::Result<T, PlotError>;
