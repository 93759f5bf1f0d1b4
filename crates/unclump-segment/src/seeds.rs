//! Seed detection
//!
//! A seed is a single pixel marking the centre of one object inside a
//! clump. Seeds are the local maxima of a signal raster: the smoothed
//! intensity, the distance transform of the foreground, or a
//! Laplacian-of-Gaussian blob response. Each plateau or cluster of equal
//! maxima collapses to one pixel.

use crate::config::{FWHM_PER_SIGMA, SegmentationConfig, SizeSetting, UnclumpStrategy};
use crate::error::{SegmentError, SegmentResult};
use rand::Rng;
use unclump_core::{LabelMap, Mask, Raster, otsu_masked};
use unclump_filter::{
    laplacian_of_gaussian, max_filter, resample_bilinear, resample_nearest, smooth,
};
use unclump_morph::{Sel, shrink_to_points};
use unclump_region::{
    BoundaryCondition, ConnectivityType, component_stats, distance_transform,
    label_connected_components,
};

/// Upper bound of the uniform jitter added to the distance transform
pub const SHAPE_JITTER: f32 = 0.001;

/// Histogram resolution of the automatic LoG threshold
const LOG_THRESHOLD_BINS: usize = 256;

/// Signal whose maxima become seeds
#[derive(Debug, Clone)]
pub struct SeedSignal {
    /// The raster searched for maxima
    pub signal: Raster,
    /// The jittered distance transform, when the shape strategy built one
    pub distance: Option<Raster>,
}

/// Build the seed signal for `strategy`
///
/// `foreground` is the labeled foreground; `mask` the validity mask. The
/// generator is only drawn from by [`UnclumpStrategy::Shape`].
///
/// # Errors
///
/// Returns `SegmentError::UnsupportedStrategyCombination` for
/// [`UnclumpStrategy::None`], and propagates filter failures.
pub fn seed_signal<R: Rng + ?Sized>(
    strategy: UnclumpStrategy,
    raster: &Raster,
    mask: &Mask,
    foreground: &LabelMap,
    config: &SegmentationConfig,
    rng: &mut R,
) -> SegmentResult<SeedSignal> {
    match strategy {
        UnclumpStrategy::Intensity => {
            let sigma = config.smoothing_filter_size() / FWHM_PER_SIGMA;
            let signal = smooth(raster, Some(mask), sigma)?;
            Ok(SeedSignal {
                signal,
                distance: None,
            })
        }
        UnclumpStrategy::Shape => {
            let mut distance =
                distance_transform(&foreground.to_mask(), BoundaryCondition::Foreground)?;
            for v in distance.data_mut() {
                *v += rng.random::<f32>() * SHAPE_JITTER;
            }
            Ok(SeedSignal {
                signal: distance.clone(),
                distance: Some(distance),
            })
        }
        UnclumpStrategy::Log => {
            let signal = log_signal(
                raster,
                mask,
                config.effective_log_diameter(),
                config.resize_factor(),
                config.log_threshold,
            )?;
            Ok(SeedSignal {
                signal,
                distance: None,
            })
        }
        UnclumpStrategy::None => Err(SegmentError::UnsupportedStrategyCombination(
            "seed detection requested with unclump strategy 'none'".into(),
        )),
    }
}

/// Thresholded Laplacian-of-Gaussian response of the inverted raster
///
/// With `factor < 1` the filter runs on a shrunken copy and the response
/// is scaled back up. The response is stretched to `[0, 1]` over the mask,
/// then everything at or below the threshold becomes 0.
fn log_signal(
    raster: &Raster,
    mask: &Mask,
    diameter: f32,
    factor: f32,
    threshold: SizeSetting,
) -> SegmentResult<Raster> {
    let (w, h) = raster.dimensions();
    let mut sigma = diameter / FWHM_PER_SIGMA;
    let mut diameter = diameter;

    let shrunk = factor < 1.0;
    let (image, image_mask) = if shrunk {
        let sw = (w as f32 * factor + 1.0) as u32;
        let sh = (h as f32 * factor + 1.0) as u32;
        let image = resample_bilinear(raster, sw, sh, factor)?;
        let image_mask =
            resample_bilinear(&mask.to_raster(), sw, sh, factor)?.map(|v| v > 0.99);
        diameter = diameter * factor + 1.0;
        sigma *= factor;
        (image, image_mask)
    } else {
        (raster.clone(), mask.clone())
    };

    let normalized = image.stretch(Some(&image_mask))?.map(|v| 1.0 - v);
    let size = (diameter * 3.0 / 2.0) as u32;
    let mut response = laplacian_of_gaussian(&normalized, &image_mask, size, sigma)?;
    if shrunk {
        response = resample_bilinear(&response, w, h, 1.0 / factor)?;
    }

    let response = response.stretch(Some(mask))?;
    let level = match threshold {
        SizeSetting::Manual(v) => v,
        SizeSetting::Auto => otsu_masked(&response, mask, 0.0, 1.0, LOG_THRESHOLD_BINS)?,
    };
    log::trace!(
        "log_signal: diameter {:.1}, sigma {:.2}, threshold {:.3}",
        diameter,
        sigma,
        level
    );
    Ok(response.map(|v| v.max(level) - level))
}

/// Find one seed per local maximum of `signal` inside the foreground
///
/// A pixel is a maximum when it is positive and no pixel within
/// `disk_radius` is larger. With `resize_factor < 1` the search runs on a
/// bilinear downsample and the maxima are scaled back with nearest
/// neighbour. Touching maxima shrink to one pixel per 8-connected cluster;
/// a cluster that would stop at a ring keeps only the pixel closest to its
/// centroid. Seeds outside the labeled foreground are dropped.
///
/// # Errors
///
/// Returns `SegmentError::InvalidInput` for a zero disk radius or a resize
/// factor outside `(0, 1]`, and a dimension mismatch if `foreground`
/// differs in size.
pub fn find_seeds(
    signal: &Raster,
    foreground: &LabelMap,
    disk_radius: u32,
    resize_factor: f32,
) -> SegmentResult<Mask> {
    if disk_radius == 0 {
        return Err(SegmentError::InvalidInput(
            "maxima suppression radius must be at least 1".to_string(),
        ));
    }
    if !(resize_factor > 0.0 && resize_factor <= 1.0) {
        return Err(SegmentError::InvalidInput(format!(
            "resize factor must be in (0, 1], got {}",
            resize_factor
        )));
    }
    signal.check_same_size(foreground)?;
    let (w, h) = signal.dimensions();

    let search = if resize_factor < 1.0 {
        let sw = (w as f32 * resize_factor).ceil() as u32;
        let sh = (h as f32 * resize_factor).ceil() as u32;
        resample_bilinear(signal, sw.max(1), sh.max(1), resize_factor)?
    } else {
        signal.clone()
    };

    let sel = Sel::create_disk(disk_radius)?;
    let neighbourhood = max_filter(&search, &sel)?;
    let mut maxima = search.zip_map(&neighbourhood, |v, m| v > 0.0 && v >= m)?;
    if resize_factor < 1.0 {
        maxima = resample_nearest(&maxima, w, h)?;
    }

    let points = single_points(&maxima)?;
    let seeds = points.zip_map(foreground, |p, label| p && label != 0)?;
    log::trace!(
        "find_seeds: {} maxima pixels, {} seeds (radius {}, factor {:.3})",
        maxima.count(),
        seeds.count(),
        disk_radius,
        resize_factor
    );
    Ok(seeds)
}

/// Shrink each 8-connected cluster of `maxima` to exactly one pixel
fn single_points(maxima: &Mask) -> SegmentResult<Mask> {
    let mut points = shrink_to_points(maxima)?;
    let (clusters, count) = label_connected_components(maxima, ConnectivityType::EightWay)?;

    let mut remaining = vec![0u32; count as usize + 1];
    for (&p, &c) in points.data().iter().zip(clusters.data()) {
        if p {
            remaining[c as usize] += 1;
        }
    }
    if remaining.iter().all(|&n| n <= 1) {
        return Ok(points);
    }

    // clusters enclosing background stop at a ring; keep the pixel nearest
    // the cluster centroid
    let mut centroids = vec![(0.0f32, 0.0f32); count as usize + 1];
    for component in component_stats(&clusters) {
        centroids[component.label as usize] = component.centroid;
    }
    let mut best: Vec<Option<(f32, usize)>> = vec![None; count as usize + 1];
    for (i, (&p, &c)) in points.data().iter().zip(clusters.data()).enumerate() {
        let c = c as usize;
        if !p || remaining[c] <= 1 {
            continue;
        }
        let (cx, cy) = centroids[c];
        let (x, y) = points.coords(i);
        let d = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
        if best[c].is_none_or(|(bd, _)| d < bd) {
            best[c] = Some((d, i));
        }
    }
    for (i, v) in points.data_mut().iter_mut().enumerate() {
        let c = clusters.data()[i] as usize;
        if *v && remaining[c] > 1 {
            *v = best[c].is_some_and(|(_, keep)| keep == i);
        }
    }
    Ok(points)
}
