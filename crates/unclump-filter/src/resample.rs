//! Raster resampling
//!
//! Scaling used by the multi-resolution seed search: bilinear sampling for
//! real-valued rasters, nearest neighbour for masks and label maps.

use crate::{FilterError, FilterResult};
use unclump_core::{Grid, Raster};

/// Resample a raster by bilinear interpolation
///
/// Output pixel `(x, y)` samples the input at `(x / scale, y / scale)`.
/// Taps that fall outside the input read as 0, so samples beyond the last
/// row or column fade towards 0 instead of being clamped.
///
/// # Errors
///
/// Returns an error if `scale` is not finite and positive or the output
/// size is empty.
pub fn resample_bilinear(
    raster: &Raster,
    out_width: u32,
    out_height: u32,
    scale: f32,
) -> FilterResult<Raster> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(FilterError::InvalidParameters(format!(
            "resample scale must be positive, got {}",
            scale
        )));
    }
    let inv = 1.0 / scale as f64;
    let tap = |x: i64, y: i64| raster.get_signed(x, y).unwrap_or(0.0) as f64;

    let out = Raster::from_fn(out_width, out_height, |x, y| {
        let sx = x as f64 * inv;
        let sy = y as f64 * inv;
        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = tap(x0, y0) * (1.0 - fx) + tap(x0 + 1, y0) * fx;
        let bottom = tap(x0, y0 + 1) * (1.0 - fx) + tap(x0 + 1, y0 + 1) * fx;
        (top * (1.0 - fy) + bottom * fy) as f32
    })?;
    log::trace!(
        "resample_bilinear: {}x{} -> {}x{} (scale {})",
        raster.width(),
        raster.height(),
        out_width,
        out_height,
        scale
    );
    Ok(out)
}

/// Resample any grid to a new size by nearest-neighbour sampling
///
/// Output pixel `(x, y)` takes the input pixel whose cell contains the
/// output cell centre, so every input pixel maps to a block of output
/// pixels when enlarging.
pub fn resample_nearest<T: Copy + Default>(
    grid: &Grid<T>,
    out_width: u32,
    out_height: u32,
) -> FilterResult<Grid<T>> {
    let (w, h) = grid.dimensions();
    let sx = w as f64 / out_width.max(1) as f64;
    let sy = h as f64 / out_height.max(1) as f64;

    let out = Grid::from_fn(out_width, out_height, |x, y| {
        let ix = (((x as f64 + 0.5) * sx) as u32).min(w - 1);
        let iy = (((y as f64 + 0.5) * sy) as u32).min(h - 1);
        grid.get_unchecked(ix, iy)
    })?;
    Ok(out)
}
