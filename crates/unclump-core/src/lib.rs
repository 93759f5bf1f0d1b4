//! unclump-core - Core data structures for clump segmentation
//!
//! This crate provides the containers shared by every stage of the
//! segmentation pipeline:
//!
//! - [`Grid`] - a row-major 2-D array with fixed width and height
//! - [`Raster`] - real-valued intensities (`Grid<f32>`)
//! - [`Mask`] - validity / foreground flags (`Grid<bool>`)
//! - [`LabelMap`] - object identifiers, `0` is background (`Grid<u32>`)
//!
//! Raster statistics used by the filters (masked extrema, contrast
//! stretching, Otsu thresholding) live alongside the containers.
//!
//! # Examples
//!
//! ```
//! use unclump_core::{Mask, Raster};
//!
//! let mut raster = Raster::new(8, 6).unwrap();
//! raster.set(3, 2, 0.75).unwrap();
//! assert_eq!(raster.get(3, 2), Some(0.75));
//!
//! let mask = Mask::new_with_value(8, 6, true).unwrap();
//! assert_eq!(mask.count(), 48);
//! assert!(raster.same_size(&mask));
//! ```

pub mod error;
pub mod grid;

pub use error::{Error, Result};
pub use grid::raster::{otsu_masked, otsu_threshold};
pub use grid::{Grid, LabelMap, Mask, Raster};
