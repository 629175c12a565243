//! sigplot-stats - Statistical functions for comparative figures
//!
//! This crate provides the numeric primitives behind sigplot's charts:
//!
//! - **Summary**: location/spread summaries and Tukey box statistics
//! - **Rank-sum**: two-sample Wilcoxon rank-sum test (normal approximation)
//! - **KDE**: Gaussian kernel density estimates for violin outlines
//!
//! # Design Philosophy
//!
//! Every function works on plain `&[f64]` slices and returns owned results.
//! Nothing is cached between calls, so the same inputs always produce the
//! same outputs.

pub mod kde;
pub mod ranksum;
pub mod summary;

pub use kde::*;
pub use ranksum::*;
pub use summary::*;

use thiserror::Error;

/// Errors raised by the statistical primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The sample had no finite values
    #[error("sample is empty")]
    EmptySample,

    /// A bandwidth was requested that cannot be used by a kernel
    #[error("invalid bandwidth: {0}")]
    InvalidBandwidth(f64),
}

/// Result alias for statistical operations
pub type StatsResult<T> = std::result::Result<T, StatsError>;
