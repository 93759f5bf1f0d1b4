//! Rank filtering operations
//!
//! Order-statistic filters over arbitrary structuring elements. Only the
//! maximum is needed for local-maximum detection.

use crate::FilterResult;
use unclump_core::Raster;
use unclump_morph::Sel;

/// Apply a maximum filter over the hits of `sel`
///
/// Each output pixel is the largest input value under the SEL placed at
/// that pixel. Hits falling outside the raster are ignored, so an edge
/// pixel is compared only against its in-raster neighbourhood.
pub fn max_filter(raster: &Raster, sel: &Sel) -> FilterResult<Raster> {
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let (w, h) = raster.dimensions();
    let mut out = Raster::new(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let best = offsets
                .iter()
                .filter_map(|&(dx, dy)| {
                    raster.get_signed(x as i64 + dx as i64, y as i64 + dy as i64)
                })
                .fold(f32::NEG_INFINITY, f32::max);
            out.set_unchecked(x, y, best);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_filter_disk() {
        let mut raster = Raster::new(7, 7).unwrap();
        raster.set_unchecked(3, 3, 5.0);
        let out = max_filter(&raster, &Sel::create_disk(2).unwrap()).unwrap();
        assert_eq!(out.get(3, 1), Some(5.0));
        assert_eq!(out.get(5, 3), Some(5.0));
        // (2, 2) diagonal offset is outside a radius-2 disk
        assert_eq!(out.get(1, 1), Some(0.0));
        assert_eq!(out.get(4, 4), Some(5.0));
    }

    #[test]
    fn test_max_filter_edges_ignore_outside() {
        let raster = Raster::new_with_value(3, 3, -2.0).unwrap();
        let out = max_filter(&raster, &Sel::create_square(3).unwrap()).unwrap();
        assert!(out.data().iter().all(|&v| v == -2.0));
    }
}
