//! Error types for unclump-segment

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while segmenting
///
/// Every variant is raised before any output label map is built, so an
/// error never comes with partial results.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] unclump_core::Error),

    /// Filter error
    #[error("filter error: {0}")]
    Filter(#[from] unclump_filter::FilterError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] unclump_morph::MorphError),

    /// Region processing error
    #[error("region error: {0}")]
    Region(#[from] unclump_region::RegionError),

    /// Malformed input: non-finite threshold, bad radius, and the like
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Raster, mask or threshold sizes disagree
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A strategy reached a stage that cannot handle it
    #[error("unsupported strategy combination: {0}")]
    UnsupportedStrategyCombination(String),

    /// Configuration values out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// I/O error while reading configuration
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for segmentation operations
pub type SegmentResult<T> = Result<T, SegmentError>;
