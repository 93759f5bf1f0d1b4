//! Border object filter
//!
//! Objects cut by the edge of the field of view are incomplete. The field
//! of view is the raster rectangle, or, when nothing touches the rectangle
//! and a partial validity mask is given, the rim of that mask.

use crate::error::{SegmentError, SegmentResult};
use unclump_core::{LabelMap, Mask};
use unclump_morph::{BoundaryType, Sel, extract_boundary};
use unclump_region::{clear_labels, labels_under};

/// Labels present on the four raster edges
fn edge_labels(labels: &LabelMap) -> Vec<bool> {
    let (w, h) = labels.dimensions();
    let mut present = vec![false; labels.max_label() as usize + 1];
    for x in 0..w {
        present[labels.get_unchecked(x, 0) as usize] = true;
        present[labels.get_unchecked(x, h - 1) as usize] = true;
    }
    for y in 0..h {
        present[labels.get_unchecked(0, y) as usize] = true;
        present[labels.get_unchecked(w - 1, y) as usize] = true;
    }
    present[0] = false;
    present
}

/// Remove objects touching the raster edge or the mask rim
///
/// Labels found on the raster edge are zeroed everywhere. If no label
/// touches the edge and `mask` is given with at least one unset pixel, the
/// labels on the mask rim (mask pixels with a 4-neighbour outside the mask)
/// are zeroed instead. Disabled, the input is returned unchanged.
///
/// # Errors
///
/// Returns `SegmentError::DimensionMismatch` if the mask size differs.
pub fn filter_by_border(
    labels: &LabelMap,
    mask: Option<&Mask>,
    enabled: bool,
) -> SegmentResult<LabelMap> {
    if let Some(m) = mask.filter(|m| !labels.same_size(m)) {
        return Err(SegmentError::DimensionMismatch {
            expected: labels.dimensions(),
            actual: m.dimensions(),
        });
    }
    if !enabled {
        return Ok(labels.clone());
    }

    let on_edge = edge_labels(labels);
    if on_edge.iter().any(|&p| p) {
        log::trace!(
            "filter_by_border: {} objects on the raster edge",
            on_edge.iter().filter(|&&p| p).count()
        );
        return Ok(clear_labels(labels, |l| on_edge[l as usize]));
    }

    match mask {
        Some(m) if !m.all() => {
            let rim = extract_boundary(m, &Sel::create_cross(3)?, BoundaryType::Inner)?;
            let on_rim = labels_under(labels, &rim)?;
            log::trace!(
                "filter_by_border: {} objects on the mask rim",
                on_rim.iter().filter(|&&p| p).count()
            );
            Ok(clear_labels(labels, |l| on_rim[l as usize]))
        }
        _ => Ok(labels.clone()),
    }
}
