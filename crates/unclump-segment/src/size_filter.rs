//! Object size filter

use crate::error::{SegmentError, SegmentResult};
use std::f64::consts::PI;
use unclump_core::LabelMap;
use unclump_region::{clear_labels, component_areas};

/// Label maps produced by [`filter_by_size`]
#[derive(Debug, Clone, PartialEq)]
pub struct SizeFiltered {
    /// Objects inside the area range
    pub filtered: LabelMap,
    /// The input, untouched
    pub unedited: LabelMap,
    /// The input with only the too-small objects removed
    pub small_removed: LabelMap,
}

/// Area of a disk of diameter `d`
pub fn disk_area(diameter: f32) -> f64 {
    PI * (diameter as f64).powi(2) / 4.0
}

/// Remove objects whose area is outside the disk areas of the diameters
///
/// Objects smaller than a disk of `min_diameter` are removed from both
/// `filtered` and `small_removed`; objects larger than a disk of
/// `max_diameter` only from `filtered`. Disabled, all three maps equal the
/// input.
///
/// # Errors
///
/// Returns `SegmentError::InvalidInput` for negative or non-finite
/// diameters.
///
/// # Examples
///
/// ```
/// use unclump_core::LabelMap;
/// use unclump_segment::filter_by_size;
///
/// // label 1 has 2 pixels, label 2 has 6
/// let labels = LabelMap::from_data(4, 2, vec![1, 1, 2, 2, 2, 2, 2, 2]).unwrap();
/// let out = filter_by_size(&labels, 2.0, 2.5, true).unwrap();
/// assert_eq!(out.filtered.data(), &[0; 8]);
/// assert_eq!(out.small_removed.data(), &[0, 0, 2, 2, 2, 2, 2, 2]);
/// assert_eq!(out.unedited, labels);
/// ```
pub fn filter_by_size(
    labels: &LabelMap,
    min_diameter: f32,
    max_diameter: f32,
    enabled: bool,
) -> SegmentResult<SizeFiltered> {
    for d in [min_diameter, max_diameter] {
        if !(d.is_finite() && d >= 0.0) {
            return Err(SegmentError::InvalidInput(format!(
                "object diameters must be finite and non-negative, got {}",
                d
            )));
        }
    }
    if !enabled {
        return Ok(SizeFiltered {
            filtered: labels.clone(),
            unedited: labels.clone(),
            small_removed: labels.clone(),
        });
    }

    let areas = component_areas(labels);
    let min_area = disk_area(min_diameter);
    let max_area = disk_area(max_diameter);

    let small_removed = clear_labels(labels, |l| (areas[l as usize] as f64) < min_area);
    let filtered = clear_labels(&small_removed, |l| (areas[l as usize] as f64) > max_area);
    log::trace!(
        "filter_by_size: area range [{:.1}, {:.1}]",
        min_area,
        max_area
    );

    Ok(SizeFiltered {
        filtered,
        unedited: labels.clone(),
        small_removed,
    })
}
