//! Unclump - Segmentation of clumped objects for Rust
//!
//! Objects brighter than a threshold are labeled, touching objects are
//! split by a seeded watershed, and objects of the wrong size or cut by the
//! field of view are discarded.
//!
//! # Overview
//!
//! - Raster, mask and label map containers
//! - Masked Gaussian smoothing, LoG filtering, rank filters, resampling
//! - Binary morphology and shrink-to-point thinning
//! - Connected components, distance transform, watershed
//! - The segmentation pipeline with TOML configuration
//!
//! # Example
//!
//! ```
//! use unclump::{Raster, SegmentationConfig, segment};
//!
//! let raster = Raster::from_fn(40, 40, |x, y| {
//!     let d2 = (x as f32 - 20.0).powi(2) + (y as f32 - 20.0).powi(2);
//!     if d2 <= 64.0 { 1.0 } else { 0.0 }
//! })
//! .unwrap();
//! let result = segment(&raster, None, 0.5, &SegmentationConfig::default()).unwrap();
//! assert_eq!(result.object_count, 1);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use unclump_core::*;

// Re-export the segmentation entry points
pub use unclump_segment::{
    SegmentError, SegmentResult, SegmentationConfig, SegmentationResult, SegmentationStatistics,
    Segmenter, SizeSetting, Threshold, UnclumpStrategy, WatershedStrategy, segment,
};

// Re-export domain crates as modules to avoid name conflicts
pub use unclump_filter as filter;
pub use unclump_morph as morph;
pub use unclump_region as region;
pub use unclump_segment as segmentation;
