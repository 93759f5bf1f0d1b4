//! Euclidean distance transform
//!
//! Exact squared-distance transform by separable lower envelopes of
//! parabolas (Felzenszwalb & Huttenlocher, "Distance Transforms of Sampled
//! Functions", 2012), run over columns and then rows.

use crate::error::RegionResult;
use unclump_core::{Mask, Raster};

/// How pixels beyond the grid edge are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Outside the grid is background, so edge pixels are at distance 1
    Background,
    /// Outside the grid is ignored; only in-grid background counts
    #[default]
    Foreground,
}

/// Stand-in for "no background seen yet"
const FAR: f64 = 1e20;

/// Distance from every set pixel to the nearest unset pixel
///
/// Unset pixels get 0. With [`BoundaryCondition::Foreground`] and no unset
/// pixel anywhere, every pixel gets the grid diagonal length.
///
/// # Examples
///
/// ```
/// use unclump_core::Mask;
/// use unclump_region::{BoundaryCondition, distance_transform};
///
/// let mask = Mask::from_fn(7, 1, |x, _| x != 0).unwrap();
/// let dist = distance_transform(&mask, BoundaryCondition::Foreground).unwrap();
/// assert_eq!(dist.get(6, 0), Some(6.0));
/// ```
pub fn distance_transform(mask: &Mask, boundary: BoundaryCondition) -> RegionResult<Raster> {
    let (w, h) = mask.dimensions();
    let pad = match boundary {
        BoundaryCondition::Background => 1usize,
        BoundaryCondition::Foreground => 0,
    };
    let pw = w as usize + 2 * pad;
    let ph = h as usize + 2 * pad;

    let mut grid = vec![0.0f64; pw * ph];
    for y in 0..h as usize {
        for x in 0..w as usize {
            if mask.get_unchecked(x as u32, y as u32) {
                grid[(y + pad) * pw + x + pad] = FAR;
            }
        }
    }

    let n = pw.max(ph);
    let mut f = vec![0.0f64; n];
    let mut d = vec![0.0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];

    for x in 0..pw {
        for y in 0..ph {
            f[y] = grid[y * pw + x];
        }
        lower_envelope(&f[..ph], &mut d[..ph], &mut v, &mut z);
        for y in 0..ph {
            grid[y * pw + x] = d[y];
        }
    }
    for y in 0..ph {
        let row = &mut grid[y * pw..(y + 1) * pw];
        f[..pw].copy_from_slice(row);
        lower_envelope(&f[..pw], &mut d[..pw], &mut v, &mut z);
        row.copy_from_slice(&d[..pw]);
    }

    let cap = ((w as f64).powi(2) + (h as f64).powi(2)).sqrt();
    let out = Raster::from_fn(w, h, |x, y| {
        let sq = grid[(y as usize + pad) * pw + x as usize + pad];
        if sq >= FAR / 2.0 {
            cap as f32
        } else {
            sq.sqrt() as f32
        }
    })?;
    Ok(out)
}

/// One-dimensional squared distance transform of `f` into `d`
fn lower_envelope(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    let intersect = |q: usize, p: usize| {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    for q in 1..n {
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate().take(n) {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_background_pixel() {
        let mask = Mask::from_fn(5, 5, |x, y| !(x == 2 && y == 2)).unwrap();
        let dist = distance_transform(&mask, BoundaryCondition::Foreground).unwrap();
        assert_eq!(dist.get(2, 2), Some(0.0));
        assert_eq!(dist.get(3, 2), Some(1.0));
        assert!((dist.get(0, 0).unwrap() - 8.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_background_boundary() {
        let mask = Mask::new_with_value(5, 3, true).unwrap();
        let dist = distance_transform(&mask, BoundaryCondition::Background).unwrap();
        assert_eq!(dist.get(0, 0), Some(1.0));
        assert_eq!(dist.get(2, 1), Some(2.0));
    }

    #[test]
    fn test_all_foreground_is_capped() {
        let mask = Mask::new_with_value(3, 4, true).unwrap();
        let dist = distance_transform(&mask, BoundaryCondition::Foreground).unwrap();
        assert!(dist.data().iter().all(|&d| d == 5.0));
    }

    #[test]
    fn test_disk_centre_distance() {
        let mask = Mask::from_fn(21, 21, |x, y| {
            let dx = x as i32 - 10;
            let dy = y as i32 - 10;
            dx * dx + dy * dy <= 64
        })
        .unwrap();
        let dist = distance_transform(&mask, BoundaryCondition::Foreground).unwrap();
        // nearest background to the centre is one of the (±1, ±8) offsets
        let centre = dist.get(10, 10).unwrap();
        assert!((centre - 65.0f32.sqrt()).abs() < 1e-5);
        let (_, hi) = dist.min_max(None).unwrap();
        assert_eq!(hi, centre);
    }
}
