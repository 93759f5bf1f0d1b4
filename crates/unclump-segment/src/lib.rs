//! unclump-segment - Seeded watershed segmentation of clumped objects
//!
//! This crate turns a raster and a threshold into labeled objects:
//!
//! - **Configuration** - `SegmentationConfig` with TOML loading and validation
//! - **Seed detection** - Local maxima of a smoothed, distance or LoG signal
//! - **Watershed partitioning** - Seeds flood a cost surface inside clumps
//! - **Size and border filters** - Drop objects outside a diameter range or
//!   cut by the field of view
//! - **Orchestration** - `segment` runs the whole pipeline and reports
//!   diagnostics
//!
//! # Examples
//!
//! ```
//! use unclump_core::Raster;
//! use unclump_segment::{SegmentationConfig, Segmenter, UnclumpStrategy};
//!
//! let raster = Raster::from_fn(40, 30, |x, y| {
//!     if (10..20).contains(&x) && (10..20).contains(&y) { 1.0 } else { 0.0 }
//! })
//! .unwrap();
//! let config = SegmentationConfig::default().with_unclump_strategy(UnclumpStrategy::None);
//! let segmenter = Segmenter::new(config).unwrap();
//! let result = segmenter.segment(&raster, None, 0.5).unwrap();
//! assert_eq!(result.object_count, 1);
//! ```

pub mod border_filter;
pub mod config;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod seeds;
pub mod size_filter;

// Re-export lower-level crates
pub use unclump_core;
pub use unclump_filter;
pub use unclump_morph;
pub use unclump_region;

// Re-export error types
pub use error::{SegmentError, SegmentResult};

// Re-export configuration
pub use config::{
    DEFAULT_SUPPRESSION_SIZE, FWHM_PER_SIGMA, SegmentationConfig, SizeSetting, UnclumpStrategy,
    WatershedStrategy,
};

// Re-export stages
pub use border_filter::filter_by_border;
pub use partition::{cost_surface, partition};
pub use seeds::{SHAPE_JITTER, SeedSignal, find_seeds, seed_signal};
pub use size_filter::{SizeFiltered, disk_area, filter_by_size};

// Re-export the orchestrator
pub use pipeline::{
    SegmentationResult, SegmentationStatistics, Segmenter, Stage, Threshold, segment,
};
