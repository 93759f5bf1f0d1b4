//! Label map utilities
//!
//! This module provides functions for measuring and editing label maps:
//! per-label areas, dense renumbering, and zeroing selected labels.

use crate::error::RegionResult;
use unclump_core::{LabelMap, Mask};

/// Pixel area of every label
///
/// Returns a vector of length `max_label + 1`; entry `i` is the number of
/// pixels carrying label `i` (entry 0 counts background).
pub fn component_areas(labels: &LabelMap) -> Vec<u32> {
    let mut areas = vec![0u32; labels.max_label() as usize + 1];
    for &v in labels.data() {
        areas[v as usize] += 1;
    }
    areas
}

/// Renumber the labels of a map to the dense range `1..=n`
///
/// Relative order is preserved: if `a < b` before, the new label of `a` is
/// smaller than the new label of `b`. Returns the new map and `n`.
pub fn relabel(labels: &LabelMap) -> (LabelMap, u32) {
    let areas = component_areas(labels);
    let mut mapping = vec![0u32; areas.len()];
    let mut count = 0u32;
    for (label, &area) in areas.iter().enumerate().skip(1) {
        if area > 0 {
            count += 1;
            mapping[label] = count;
        }
    }
    (labels.map(|v| mapping[v as usize]), count)
}

/// Zero every pixel whose label satisfies `remove`
///
/// Background pixels are never passed to the predicate.
pub fn clear_labels(labels: &LabelMap, mut remove: impl FnMut(u32) -> bool) -> LabelMap {
    let max_label = labels.max_label() as usize;
    let doomed: Vec<bool> = (0..=max_label)
        .map(|l| l != 0 && remove(l as u32))
        .collect();
    labels.map(|v| if doomed[v as usize] { 0 } else { v })
}

/// Flags for the labels that occur on the set pixels of `where_`
///
/// Returns a vector of length `max_label + 1`; entry `i` is `true` when
/// label `i` appears on at least one selected pixel. Entry 0 is always
/// `false`.
///
/// # Errors
///
/// Returns an error if the mask size differs from the label map.
pub fn labels_under(labels: &LabelMap, where_: &Mask) -> RegionResult<Vec<bool>> {
    labels.check_same_size(where_)?;
    let mut present = vec![false; labels.max_label() as usize + 1];
    for (&v, &m) in labels.data().iter().zip(where_.data()) {
        if m && v != 0 {
            present[v as usize] = true;
        }
    }
    Ok(present)
}

/// Count the distinct non-zero labels of a map
pub fn count_labels(labels: &LabelMap) -> u32 {
    component_areas(labels)
        .iter()
        .skip(1)
        .filter(|&&a| a > 0)
        .count() as u32
}
