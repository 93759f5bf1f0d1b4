//! unclump-filter - Raster filtering for clump segmentation
//!
//! This crate provides the filters the segmentation pipeline is built on:
//!
//! - Convolution kernels (Gaussian, Laplacian of Gaussian)
//! - Constant-border convolution, separable and full 2-D
//! - Masked Gaussian smoothing with edge-weight renormalisation
//! - Laplacian-of-Gaussian blob enhancement with masked-pixel correction
//! - Maximum rank filter over a structuring-element footprint
//! - Bilinear and nearest-neighbour resampling

pub mod blob;
pub mod convolve;
mod error;
pub mod kernel;
pub mod rank;
pub mod resample;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convolve::{
    MIN_EDGE_WEIGHT, convolve, convolve_sep, gaussian_blur, masked_gaussian_blur, smooth,
};
pub use blob::laplacian_of_gaussian;
pub use rank::max_filter;
pub use resample::{resample_bilinear, resample_nearest};
