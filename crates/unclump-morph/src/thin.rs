//! Topology-preserving shrinking
//!
//! Shrinking repeatedly deletes "simple" pixels: pixels whose removal
//! neither splits an 8-connected cluster nor merges background regions.
//! Each sweep runs four directional sub-passes (north, south, west, east),
//! visiting pixels in raster order and deleting them immediately, until a
//! full sweep removes nothing.
//!
//! A cluster without holes collapses to a single pixel. A cluster that
//! encloses background stops at a closed one-pixel ring.
//!
//! # Reference
//!
//! The simplicity test is the Yokoi connectivity number for 8-connected
//! foreground (Yokoi, Toriwaki, Fukumura, 1975).

use crate::MorphResult;
use unclump_core::Mask;

/// Neighbour offsets in the order E, NE, N, NW, W, SW, S, SE
const RING: [(i64, i64); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Directions of the four sub-passes: the neighbour that must be background
const SUB_PASSES: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Yokoi 8-connectivity number of the pixel at (x, y)
///
/// A set pixel with connectivity number 1 is simple: deleting it keeps the
/// number of foreground and background components unchanged. Isolated and
/// interior pixels have 0; pixels bridging separate branches have 2 or more.
/// Positions outside the grid are background.
pub fn connectivity_number(mask: &Mask, x: u32, y: u32) -> u32 {
    let mut bg = [false; 9];
    for (k, &(dx, dy)) in RING.iter().enumerate() {
        bg[k] = !mask
            .get_signed(x as i64 + dx, y as i64 + dy)
            .unwrap_or(false);
    }
    bg[8] = bg[0];

    (0..4)
        .map(|i| {
            let k = 2 * i;
            let term = bg[k] && !(bg[k + 1] && bg[k + 2]);
            u32::from(term)
        })
        .sum()
}

/// Shrink every 8-connected cluster of a mask down to a point
///
/// Clusters with holes shrink to rings instead; callers that need exactly
/// one pixel per cluster must resolve those themselves.
///
/// # Examples
///
/// ```
/// use unclump_core::Mask;
/// use unclump_morph::shrink_to_points;
///
/// let block = Mask::new_with_value(4, 3, true).unwrap();
/// let points = shrink_to_points(&block).unwrap();
/// assert_eq!(points.count(), 1);
/// ```
pub fn shrink_to_points(mask: &Mask) -> MorphResult<Mask> {
    let mut out = mask.clone();
    let mut sweeps = 0u32;

    loop {
        let mut removed = 0usize;
        for &(bx, by) in &SUB_PASSES {
            for y in 0..out.height() {
                for x in 0..out.width() {
                    if !out.get_unchecked(x, y) {
                        continue;
                    }
                    let exposed = !out
                        .get_signed(x as i64 + bx, y as i64 + by)
                        .unwrap_or(false);
                    if exposed && connectivity_number(&out, x, y) == 1 {
                        out.set_unchecked(x, y, false);
                        removed += 1;
                    }
                }
            }
        }
        sweeps += 1;
        if removed == 0 {
            break;
        }
    }

    log::trace!(
        "shrink_to_points: {} -> {} pixels in {} sweeps",
        mask.count(),
        out.count(),
        sweeps
    );
    Ok(out)
}
