//! unclump-region - Region processing for clump segmentation
//!
//! This crate provides region processing functionality including:
//!
//! - **Connected component analysis** - Finding and labeling connected regions
//! - **Label map utilities** - Areas, dense relabeling, selective clearing
//! - **Seed fill operations** - Flood fill and labeled hole filling
//! - **Distance transform** - Exact Euclidean distance to background
//! - **Watershed segmentation** - Marker-controlled flooding with a bucket queue
//! - **Outlines** - Rim pixels of labeled objects
//!
//! # Examples
//!
//! ## Finding connected components
//!
//! ```
//! use unclump_core::Mask;
//! use unclump_region::{ConnectivityType, find_connected_components};
//!
//! let mut mask = Mask::new(100, 100).unwrap();
//! mask.set(10, 10, true).unwrap();
//! mask.set(11, 10, true).unwrap();
//! mask.set(50, 50, true).unwrap();
//!
//! let components = find_connected_components(&mask, ConnectivityType::FourWay).unwrap();
//! assert_eq!(components.len(), 2);
//! ```
//!
//! ## Watershed segmentation
//!
//! ```
//! use unclump_core::{LabelMap, Mask, Raster};
//! use unclump_region::{WatershedOptions, watershed};
//!
//! let cost = Raster::new(10, 10).unwrap();
//! let mut markers = LabelMap::new(10, 10).unwrap();
//! markers.set(2, 2, 1).unwrap();
//! let mask = Mask::new_with_value(10, 10, true).unwrap();
//! let labels = watershed(&cost, &markers, &mask, &WatershedOptions::default()).unwrap();
//! assert!(labels.data().iter().all(|&v| v == 1));
//! ```

pub mod conncomp;
pub mod distance;
pub mod error;
pub mod label;
pub mod outline;
pub mod seedfill;
pub mod watershed;

// Re-export core types
pub use unclump_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export conncomp types and functions
pub use conncomp::{
    BoundingBox, ConnectedComponent, ConnectivityType, component_stats,
    find_connected_components, label_connected_components,
};

// Re-export label functions
pub use label::{clear_labels, component_areas, count_labels, labels_under, relabel};

// Re-export seedfill functions
pub use seedfill::fill_labeled_holes;

// Re-export distance transform
pub use distance::{BoundaryCondition, distance_transform};

// Re-export watershed types and functions
pub use watershed::{BucketQueue, WatershedOptions, watershed};

// Re-export outline
pub use outline::outline;
