//! Laplacian-of-Gaussian blob filter

use crate::convolve::convolve;
use crate::{FilterResult, Kernel};
use unclump_core::{Mask, Raster};

/// Filter a raster with a Laplacian-of-Gaussian kernel, honouring a mask
///
/// `size` and `sigma` are passed to [`Kernel::laplacian_of_gaussian`].
/// Unmasked pixels are treated as if they held the value of the pixel being
/// filtered: they are zeroed for the main convolution, and the kernel mass
/// that lands outside the mask (or outside the raster) is convolved
/// separately and added back scaled by the centre value. Unmasked pixels
/// keep their input value.
///
/// Bright blobs near the scale of `sigma` produce strongly negative output.
///
/// # Errors
///
/// Returns an error if the mask size differs or the kernel parameters are
/// invalid.
pub fn laplacian_of_gaussian(
    raster: &Raster,
    mask: &Mask,
    size: u32,
    sigma: f32,
) -> FilterResult<Raster> {
    raster.check_same_size(mask)?;
    let kernel = Kernel::laplacian_of_gaussian(size, sigma)?;

    let masked = raster.zip_map(mask, |v, m| if m { v } else { 0.0 })?;
    let response = convolve(&masked, &kernel, 0.0)?;
    let outside = convolve(&mask.not().to_raster(), &kernel, 1.0)?;

    let mut out = response;
    for (i, v) in out.data_mut().iter_mut().enumerate() {
        let value = raster.data()[i];
        if mask.data()[i] {
            *v += outside.data()[i] * value;
        } else {
            *v = value;
        }
    }
    log::trace!(
        "laplacian_of_gaussian: kernel {}x{}, sigma {}",
        kernel.width(),
        kernel.height(),
        sigma
    );
    Ok(out)
}
