//! Binary morphology on masks
//!
//! Pixels outside the grid are treated as background for both erosion and
//! dilation, so erosion clears everything within reach of the grid edge.

use crate::{MorphResult, Sel};
use unclump_core::Mask;

/// Dilate a mask
///
/// A pixel is set if any hit of the SEL, placed at that pixel, covers a
/// set source pixel.
pub fn dilate(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let hit_offsets: Vec<_> = sel.hit_offsets().collect();
    let mut out = Mask::new(mask.width(), mask.height())?;

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let hit = hit_offsets.iter().any(|&(dx, dy)| {
                mask.get_signed(x as i64 - dx as i64, y as i64 - dy as i64)
                    .unwrap_or(false)
            });
            if hit {
                out.set_unchecked(x, y, true);
            }
        }
    }

    Ok(out)
}

/// Erode a mask
///
/// A pixel stays set only if every hit of the SEL, placed at that pixel,
/// covers a set source pixel. Hits that fall outside the grid count as
/// unset.
pub fn erode(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let hit_offsets: Vec<_> = sel.hit_offsets().collect();
    let mut out = Mask::new(mask.width(), mask.height())?;

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if !mask.get_unchecked(x, y) {
                continue;
            }
            let keep = hit_offsets.iter().all(|&(dx, dy)| {
                mask.get_signed(x as i64 + dx as i64, y as i64 + dy as i64)
                    .unwrap_or(false)
            });
            if keep {
                out.set_unchecked(x, y, true);
            }
        }
    }

    Ok(out)
}

/// Boundary type for [`extract_boundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryType {
    /// Background boundary: pixels just outside the set region.
    /// Computed as dilation AND NOT original.
    Outer,
    /// Foreground boundary: set pixels on the inner edge of the region.
    /// Computed as original AND NOT erosion.
    Inner,
}

/// Extract boundary pixels of a mask with respect to a SEL
///
/// With [`BoundaryType::Inner`] and a 3x3 cross, this is the set of mask
/// pixels that have a 4-neighbour outside the mask (or outside the grid).
pub fn extract_boundary(mask: &Mask, sel: &Sel, boundary_type: BoundaryType) -> MorphResult<Mask> {
    let boundary = match boundary_type {
        BoundaryType::Outer => dilate(mask, sel)?.and_not(mask)?,
        BoundaryType::Inner => mask.and_not(&erode(mask, sel)?)?,
    };
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask() -> Mask {
        // 7x7 with a 3x3 block at (2..=4, 2..=4)
        Mask::from_fn(7, 7, |x, y| (2..=4).contains(&x) && (2..=4).contains(&y)).unwrap()
    }

    #[test]
    fn test_erode_dilate_square() {
        let mask = square_mask();
        let sel = Sel::create_square(3).unwrap();
        let eroded = erode(&mask, &sel).unwrap();
        assert_eq!(eroded.count(), 1);
        assert_eq!(eroded.get(3, 3), Some(true));

        let dilated = dilate(&mask, &sel).unwrap();
        assert_eq!(dilated.count(), 25);
    }

    #[test]
    fn test_erode_grid_edge_is_background() {
        let mask = Mask::new_with_value(4, 3, true).unwrap();
        let cross = Sel::create_cross(3).unwrap();
        let eroded = erode(&mask, &cross).unwrap();
        // only the two interior pixels survive
        assert_eq!(eroded.count(), 2);
        assert_eq!(eroded.get(1, 1), Some(true));
        assert_eq!(eroded.get(2, 1), Some(true));
    }

    #[test]
    fn test_extract_boundary() {
        let mask = square_mask();
        let cross = Sel::create_cross(3).unwrap();
        let inner = extract_boundary(&mask, &cross, BoundaryType::Inner).unwrap();
        assert_eq!(inner.count(), 8);
        assert_eq!(inner.get(3, 3), Some(false));

        let outer = extract_boundary(&mask, &cross, BoundaryType::Outer).unwrap();
        assert_eq!(outer.count(), 12);
    }
}
