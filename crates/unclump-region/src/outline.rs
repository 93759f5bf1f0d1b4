//! Object outlines
//!
//! Marks the labeled pixels that sit on the rim of their object, for
//! diagnostic overlays.

use crate::conncomp::{ConnectivityType, neighbors};
use unclump_core::{LabelMap, Mask};

/// Outline pixels of every object in a label map
///
/// A labeled pixel is on the outline if one of its neighbours (under
/// `connectivity`) carries a different label, including background, or if
/// it lies on the grid edge.
///
/// # Examples
///
/// ```
/// use unclump_core::LabelMap;
/// use unclump_region::{ConnectivityType, outline};
///
/// let labels = LabelMap::from_fn(5, 5, |x, y| {
///     u32::from((1..4).contains(&x) && (1..4).contains(&y))
/// })
/// .unwrap();
/// let rim = outline(&labels, ConnectivityType::EightWay);
/// assert_eq!(rim.count(), 8);
/// ```
pub fn outline(labels: &LabelMap, connectivity: ConnectivityType) -> Mask {
    let (w, h) = labels.dimensions();
    let mut rim = labels.map(|_| false);

    for y in 0..h {
        for x in 0..w {
            let label = labels.get_unchecked(x, y);
            if label == 0 {
                continue;
            }
            let on_rim = labels.is_edge(x, y)
                || neighbors(w, h, x, y, connectivity)
                    .any(|(nx, ny)| labels.get_unchecked(nx, ny) != label);
            if on_rim {
                rim.set_unchecked(x, y, true);
            }
        }
    }

    rim
}
