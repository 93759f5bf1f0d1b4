//! Convolution operations
//!
//! Implements raster convolution with arbitrary kernels and the Gaussian
//! smoothing built on top of it. Pixels outside the raster take a constant
//! border value.

use crate::{FilterError, FilterResult, Kernel};
use unclump_core::{Mask, Raster};

/// Smallest edge weight used as a divisor in masked smoothing
///
/// Pixels whose blurred mask weight falls below this value (masked pixels
/// far from any other masked pixel) are divided by it instead.
pub const MIN_EDGE_WEIGHT: f32 = 1e-6;

/// Convolve a raster with a kernel
///
/// Samples outside the raster read as `border_value`. The kernel is applied
/// in correlation form; every kernel built by [`Kernel`] is symmetric, so
/// the distinction does not arise.
pub fn convolve(raster: &Raster, kernel: &Kernel, border_value: f32) -> FilterResult<Raster> {
    let (w, h) = raster.dimensions();
    let kw = kernel.width();
    let kh = kernel.height();
    let kcx = kernel.center_x() as i64;
    let kcy = kernel.center_y() as i64;
    let weights = kernel.data();

    let mut out = Raster::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f64;
            for ky in 0..kh {
                let sy = y as i64 + ky as i64 - kcy;
                for kx in 0..kw {
                    let k = weights[(ky * kw + kx) as usize];
                    if k == 0.0 {
                        continue;
                    }
                    let sx = x as i64 + kx as i64 - kcx;
                    let v = raster.get_signed(sx, sy).unwrap_or(border_value);
                    sum += v as f64 * k as f64;
                }
            }
            out.set_unchecked(x, y, sum as f32);
        }
    }
    Ok(out)
}

/// Separable convolution: `kernel_x` along rows, then `kernel_y` along columns
///
/// # Errors
///
/// Returns `FilterError::InvalidKernel` if `kernel_x` is not a single row
/// or `kernel_y` is not a single column.
pub fn convolve_sep(
    raster: &Raster,
    kernel_x: &Kernel,
    kernel_y: &Kernel,
    border_value: f32,
) -> FilterResult<Raster> {
    if kernel_x.height() != 1 || kernel_y.width() != 1 {
        return Err(FilterError::InvalidKernel(format!(
            "separable kernels must be 1-D: got {}x{} and {}x{}",
            kernel_x.width(),
            kernel_x.height(),
            kernel_y.width(),
            kernel_y.height()
        )));
    }
    let horizontal = convolve(raster, kernel_x, border_value)?;
    convolve(&horizontal, kernel_y, border_value)
}

/// Gaussian blur with a zero border
///
/// A non-positive `sigma` returns a copy of the input.
pub fn gaussian_blur(raster: &Raster, sigma: f32) -> FilterResult<Raster> {
    if sigma <= 0.0 {
        return Ok(raster.clone());
    }
    let kx = Kernel::gaussian_1d(sigma)?;
    let ky = kx.transposed();
    convolve_sep(raster, &kx, &ky, 0.0)
}

/// Gaussian blur of a raster restricted to a mask
///
/// Unmasked pixels contribute nothing. The blurred raster is divided by the
/// blurred mask, so pixels near the mask edge are renormalized by the share
/// of the kernel that fell on masked pixels. Weights below
/// [`MIN_EDGE_WEIGHT`] are clamped to it.
///
/// # Errors
///
/// Returns an error if the mask size differs from the raster or `sigma`
/// is not positive.
pub fn masked_gaussian_blur(raster: &Raster, mask: &Mask, sigma: f32) -> FilterResult<Raster> {
    raster.check_same_size(mask)?;
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(FilterError::InvalidParameters(format!(
            "masked blur sigma must be positive, got {}",
            sigma
        )));
    }

    let masked = raster.zip_map(mask, |v, m| if m { v } else { 0.0 })?;
    let blurred = gaussian_blur(&masked, sigma)?;
    let weight = gaussian_blur(&mask.to_raster(), sigma)?;

    let mut clamped = 0usize;
    let out = blurred.zip_map(&weight, |v, wt| {
        if wt < MIN_EDGE_WEIGHT {
            clamped += 1;
            v / MIN_EDGE_WEIGHT
        } else {
            v / wt
        }
    })?;
    if clamped > 0 {
        log::warn!(
            "masked_gaussian_blur: clamped edge weight at {} pixels (sigma {})",
            clamped,
            sigma
        );
    }
    Ok(out)
}

/// Edge-corrected smoothing
///
/// A non-positive `sigma` is the identity. Otherwise this is
/// [`masked_gaussian_blur`], with a missing mask taken as all-true so the
/// raster edges are corrected the same way as mask edges.
///
/// # Examples
///
/// ```
/// use unclump_core::{Mask, Raster};
/// use unclump_filter::smooth;
///
/// // a constant raster stays constant inside the mask, even at its edge
/// let raster = Raster::new_with_value(9, 9, 2.0).unwrap();
/// let mask = Mask::from_fn(9, 9, |x, _| x < 5).unwrap();
/// let out = smooth(&raster, Some(&mask), 1.5).unwrap();
/// assert!((out.get(4, 4).unwrap() - 2.0).abs() < 1e-4);
/// ```
pub fn smooth(raster: &Raster, mask: Option<&Mask>, sigma: f32) -> FilterResult<Raster> {
    if sigma <= 0.0 {
        return Ok(raster.clone());
    }
    match mask {
        Some(m) => masked_gaussian_blur(raster, m, sigma),
        None => {
            let (w, h) = raster.dimensions();
            masked_gaussian_blur(raster, &Mask::new_with_value(w, h, true)?, sigma)
        }
    }
}
