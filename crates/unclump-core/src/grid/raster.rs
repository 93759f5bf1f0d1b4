//! Raster statistics
//!
//! Masked extrema, contrast stretching and Otsu thresholding over
//! real-valued grids. Every function takes an optional [`Mask`]; `None`
//! means every pixel participates.

use super::{Grid, Mask, Raster};
use crate::error::{Error, Result};

impl Grid<f32> {
    /// Minimum and maximum over the masked pixels
    ///
    /// Returns `None` when no pixel is selected.
    pub fn min_max(&self, mask: Option<&Mask>) -> Option<(f32, f32)> {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        let mut seen = false;
        for (i, &v) in self.data().iter().enumerate() {
            if mask.is_some_and(|m| !m.data()[i]) {
                continue;
            }
            lo = lo.min(v);
            hi = hi.max(v);
            seen = true;
        }
        seen.then_some((lo, hi))
    }

    /// Mean over all pixels
    pub fn mean(&self) -> f32 {
        let sum: f64 = self.data().iter().map(|&v| v as f64).sum();
        (sum / self.len() as f64) as f32
    }

    /// Linearly rescale the masked pixels so their range becomes [0, 1]
    ///
    /// Pixels outside the mask are copied unchanged. If the masked pixels
    /// are all equal, they are clipped into [0, 1] instead of rescaled.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the mask size differs.
    pub fn stretch(&self, mask: Option<&Mask>) -> Result<Raster> {
        if let Some(m) = mask {
            self.check_same_size(m)?;
        }
        let Some((lo, hi)) = self.min_max(mask) else {
            return Ok(self.clone());
        };

        let mut out = self.clone();
        let selected = |i: usize| mask.is_none_or(|m| m.data()[i]);
        if lo == hi {
            let value = lo.clamp(0.0, 1.0);
            for (i, v) in out.data_mut().iter_mut().enumerate() {
                if selected(i) {
                    *v = value;
                }
            }
        } else {
            let range = hi - lo;
            for (i, v) in out.data_mut().iter_mut().enumerate() {
                if selected(i) {
                    *v = (*v - lo) / range;
                }
            }
        }
        Ok(out)
    }
}

/// Otsu threshold of a set of values, histogrammed into `bins` bins over
/// `[lo, hi]`
///
/// Values outside the range are clamped into the end bins. The result is
/// the bin boundary (in value units) that maximises the between-class
/// variance. An empty input yields `lo`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `bins < 2` or `lo >= hi`.
pub fn otsu_threshold(values: &[f32], lo: f32, hi: f32, bins: usize) -> Result<f32> {
    if bins < 2 {
        return Err(Error::InvalidParameter(format!(
            "otsu needs at least 2 bins, got {}",
            bins
        )));
    }
    if !(lo < hi) {
        return Err(Error::InvalidParameter(format!(
            "otsu range is empty: [{}, {}]",
            lo, hi
        )));
    }
    if values.is_empty() {
        return Ok(lo);
    }

    let scale = (bins - 1) as f32 / (hi - lo);
    let mut histogram = vec![0u64; bins];
    for &v in values {
        let bin = ((v.clamp(lo, hi) - lo) * scale).round() as usize;
        histogram[bin.min(bins - 1)] += 1;
    }

    let total = values.len() as f64;
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut sum_b = 0.0;
    let mut weight_b = 0.0;
    let mut max_variance = 0.0;
    let mut threshold = 0usize;

    for (i, &count) in histogram.iter().enumerate() {
        weight_b += count as f64;
        if weight_b == 0.0 {
            continue;
        }
        let weight_f = total - weight_b;
        if weight_f == 0.0 {
            break;
        }

        sum_b += i as f64 * count as f64;
        let mean_b = sum_b / weight_b;
        let mean_f = (sum - sum_b) / weight_f;
        let variance = weight_b * weight_f * (mean_b - mean_f).powi(2);

        if variance > max_variance {
            max_variance = variance;
            threshold = i;
        }
    }

    Ok(lo + threshold as f32 / scale)
}

/// Otsu threshold of the masked pixels of a raster
///
/// # Errors
///
/// See [`otsu_threshold`]; also fails on a mask size mismatch.
pub fn otsu_masked(raster: &Raster, mask: &Mask, lo: f32, hi: f32, bins: usize) -> Result<f32> {
    raster.check_same_size(mask)?;
    let values: Vec<f32> = raster
        .data()
        .iter()
        .zip(mask.data())
        .filter_map(|(&v, &m)| m.then_some(v))
        .collect();
    otsu_threshold(&values, lo, hi, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_masked() {
        let raster = Raster::from_data(3, 1, vec![5.0, -1.0, 2.0]).unwrap();
        assert_eq!(raster.min_max(None), Some((-1.0, 5.0)));
        let mask = Mask::from_data(3, 1, vec![true, false, true]).unwrap();
        assert_eq!(raster.min_max(Some(&mask)), Some((2.0, 5.0)));
        let none = Mask::new(3, 1).unwrap();
        assert_eq!(raster.min_max(Some(&none)), None);
    }

    #[test]
    fn test_stretch_leaves_unmasked_pixels() {
        let raster = Raster::from_data(4, 1, vec![2.0, 4.0, 6.0, 100.0]).unwrap();
        let mask = Mask::from_data(4, 1, vec![true, true, true, false]).unwrap();
        let out = raster.stretch(Some(&mask)).unwrap();
        assert_eq!(out.data(), &[0.0, 0.5, 1.0, 100.0]);
    }

    #[test]
    fn test_stretch_constant_is_clipped() {
        let raster = Raster::new_with_value(2, 2, 3.0).unwrap();
        let out = raster.stretch(None).unwrap();
        assert!(out.data().iter().all(|&v| v == 1.0));
        let raster = Raster::new_with_value(2, 2, 0.25).unwrap();
        let out = raster.stretch(None).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_otsu_bimodal() {
        let mut values = vec![0.1f32; 100];
        values.extend(std::iter::repeat_n(0.9f32, 100));
        let t = otsu_threshold(&values, 0.0, 1.0, 256).unwrap();
        assert!(t >= 0.1 && t < 0.9, "threshold {} not between modes", t);
    }

    #[test]
    fn test_otsu_rejects_bad_range() {
        assert!(otsu_threshold(&[0.5], 1.0, 1.0, 256).is_err());
        assert!(otsu_threshold(&[0.5], 0.0, 1.0, 1).is_err());
        assert_eq!(otsu_threshold(&[], 0.0, 1.0, 256).unwrap(), 0.0);
    }
}
