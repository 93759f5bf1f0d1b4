//! unclump-morph - Binary morphology for clump segmentation
//!
//! This crate provides the morphological building blocks of the pipeline:
//!
//! - Structuring elements (SEL), including the disk footprint used for
//!   maxima suppression
//! - Binary erosion and dilation with an "outside is background" border
//! - Boundary extraction (used to find the rim of a validity mask)
//! - Topology-preserving shrinking of clusters down to single points

pub mod binary;
mod error;
pub mod sel;
pub mod thin;

pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};

// Re-export binary morphology functions
pub use binary::{BoundaryType, dilate, erode, extract_boundary};

// Re-export thinning functions
pub use thin::{connectivity_number, shrink_to_points};
