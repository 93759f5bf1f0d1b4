//! Segmentation orchestrator
//!
//! Runs the stages in order:
//!
//! `Smoothing -> ForegroundLabeling -> HoleFill -> Declumping -> SizeFilter
//! -> BorderFilter -> Relabel -> HoleFill -> OutlineExtraction -> Done`
//!
//! Every stage returns a fresh map. The maps entering the size and border
//! filters are kept for the excluded-object diagnostics.

use crate::border_filter::filter_by_border;
use crate::config::{DEFAULT_SUPPRESSION_SIZE, SegmentationConfig};
use crate::error::{SegmentError, SegmentResult};
use crate::partition::{cost_surface, partition};
use crate::seeds::{find_seeds, seed_signal};
use crate::size_filter::filter_by_size;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f32::consts::PI;
use std::fmt;
use unclump_core::{LabelMap, Mask, Raster};
use unclump_filter::smooth;
use unclump_region::{
    ConnectivityType, component_areas, fill_labeled_holes, label_connected_components, outline,
    relabel,
};

/// Sigma of the light smoothing applied before thresholding
const FOREGROUND_SIGMA: f32 = 1.0;

/// Foreground threshold, one value or one per pixel
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// Same threshold everywhere
    Global(f32),
    /// Threshold raster of the input's size
    PerPixel(Raster),
}

impl Threshold {
    /// The global value, or the mean of a per-pixel threshold
    pub fn mean(&self) -> f32 {
        match self {
            Threshold::Global(t) => *t,
            Threshold::PerPixel(r) => r.mean(),
        }
    }

    fn validate(&self, raster: &Raster) -> SegmentResult<()> {
        match self {
            Threshold::Global(t) if !t.is_finite() => Err(SegmentError::InvalidInput(format!(
                "threshold must be finite, got {}",
                t
            ))),
            Threshold::Global(_) => Ok(()),
            Threshold::PerPixel(r) if !r.same_size(raster) => {
                Err(SegmentError::DimensionMismatch {
                    expected: raster.dimensions(),
                    actual: r.dimensions(),
                })
            }
            Threshold::PerPixel(r) if r.data().iter().any(|v| !v.is_finite()) => Err(
                SegmentError::InvalidInput("per-pixel threshold has non-finite values".into()),
            ),
            Threshold::PerPixel(_) => Ok(()),
        }
    }

    fn foreground(&self, smoothed: &Raster, valid: &Mask) -> SegmentResult<Mask> {
        let above = match self {
            Threshold::Global(t) => smoothed.map(|v| v >= *t),
            Threshold::PerPixel(r) => smoothed.zip_map(r, |v, t| v >= t)?,
        };
        Ok(above.and(valid)?)
    }
}

impl From<f32> for Threshold {
    fn from(value: f32) -> Self {
        Threshold::Global(value)
    }
}

impl From<Raster> for Threshold {
    fn from(value: Raster) -> Self {
        Threshold::PerPixel(value)
    }
}

/// Pipeline stage, used in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Smoothing,
    ForegroundLabeling,
    HoleFill,
    Declumping,
    SizeFilter,
    BorderFilter,
    Relabel,
    OutlineExtraction,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Smoothing => "smoothing",
            Stage::ForegroundLabeling => "foreground labeling",
            Stage::HoleFill => "hole fill",
            Stage::Declumping => "declumping",
            Stage::SizeFilter => "size filter",
            Stage::BorderFilter => "border filter",
            Stage::Relabel => "relabel",
            Stage::OutlineExtraction => "outline extraction",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Summary numbers of one segmentation run
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationStatistics {
    /// Threshold used, the mean for a per-pixel threshold
    pub threshold: f32,
    /// Number of final objects
    pub object_count: u32,
    /// Equivalent diameter at the 10th area percentile
    pub low_diameter: Option<f32>,
    /// Equivalent diameter at the 90th area percentile
    pub high_diameter: Option<f32>,
    /// Percentage of the raster covered by final objects
    pub area_covered_percent: f32,
    /// Gaussian smoothing filter size used for declumping
    pub smoothing_filter_size: f32,
    /// Maxima suppression size, at the search resolution
    pub maxima_suppression_size: f32,
}

/// Output of [`segment`]
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    /// Final objects, labeled `1..=object_count`
    pub labels: LabelMap,
    /// Objects before size filtering
    pub unedited: LabelMap,
    /// Objects with only the too-small ones removed
    pub small_removed: LabelMap,
    /// Objects removed by the size filter
    pub size_excluded: LabelMap,
    /// Objects removed by the border filter
    pub border_excluded: LabelMap,
    /// Number of final objects
    pub object_count: u32,
    /// Outline of the final objects
    pub outline: Mask,
    /// Outline of the size-excluded objects
    pub size_excluded_outline: Mask,
    /// Outline of the border-excluded objects
    pub border_excluded_outline: Mask,
    /// Threshold, sizes and diameter percentiles of the run
    pub statistics: SegmentationStatistics,
}

/// Segmentation with a fixed, validated configuration
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    /// Create a segmenter
    ///
    /// # Errors
    ///
    /// Returns the validation error of an inconsistent configuration.
    pub fn new(config: SegmentationConfig) -> SegmentResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment `raster` at `threshold`, inside `mask` if given
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::DimensionMismatch` if the mask or a per-pixel
    /// threshold differs in size from the raster, and
    /// `SegmentError::InvalidInput` for non-finite raster or threshold
    /// values. An empty foreground is not an error.
    pub fn segment(
        &self,
        raster: &Raster,
        mask: Option<&Mask>,
        threshold: impl Into<Threshold>,
    ) -> SegmentResult<SegmentationResult> {
        let threshold = threshold.into();
        self.check_inputs(raster, mask, &threshold)?;
        let config = &self.config;
        let (w, h) = raster.dimensions();
        let valid = match mask {
            Some(m) => m.clone(),
            None => Mask::new_with_value(w, h, true)?,
        };

        log::debug!("segment: {}", Stage::Smoothing);
        let smoothed = if config.smoothing_filter_size() > 0.0 {
            smooth(raster, Some(&valid), FOREGROUND_SIGMA)?
        } else {
            raster.clone()
        };

        log::debug!("segment: {}", Stage::ForegroundLabeling);
        let foreground = threshold.foreground(&smoothed, &valid)?;
        let (mut labels, count) =
            label_connected_components(&foreground, ConnectivityType::EightWay)?;
        log::debug!("segment: {} foreground components", count);
        if count == 0 {
            return self.empty_result(w, h, &threshold);
        }

        if config.fill_holes {
            log::debug!("segment: {}", Stage::HoleFill);
            labels = fill_labeled_holes(&labels)?;
        }

        let suppression_size = if config.declumps() {
            log::debug!("segment: {}", Stage::Declumping);
            labels = self.declump(raster, &valid, &labels)?;
            config.suppression_radius() as f32
        } else {
            DEFAULT_SUPPRESSION_SIZE
        };

        log::debug!("segment: {}", Stage::SizeFilter);
        let sized = filter_by_size(
            &labels,
            config.min_diameter,
            config.max_diameter,
            config.discard_by_size,
        )?;
        let size_excluded = removed(&sized.unedited, &sized.filtered)?;

        log::debug!("segment: {}", Stage::BorderFilter);
        let bordered = filter_by_border(&sized.filtered, mask, config.discard_border_objects)?;
        let border_excluded = removed(&sized.filtered, &bordered)?;

        log::debug!("segment: {}", Stage::Relabel);
        let (mut labels, object_count) = relabel(&bordered);
        if config.fill_holes {
            log::debug!("segment: {}", Stage::HoleFill);
            labels = fill_labeled_holes(&labels)?;
        }

        log::debug!("segment: {}", Stage::OutlineExtraction);
        let conn = ConnectivityType::EightWay;
        let outline_final = outline(&labels, conn);
        let size_excluded_outline = outline(&size_excluded, conn);
        let border_excluded_outline = outline(&border_excluded, conn);

        let statistics = SegmentationStatistics {
            threshold: threshold.mean(),
            object_count,
            low_diameter: None,
            high_diameter: None,
            area_covered_percent: 0.0,
            smoothing_filter_size: config.smoothing_filter_size(),
            maxima_suppression_size: suppression_size,
        }
        .with_areas(&labels);
        log::debug!("segment: {}, {} objects", Stage::Done, object_count);

        Ok(SegmentationResult {
            labels,
            unedited: sized.unedited,
            small_removed: sized.small_removed,
            size_excluded,
            border_excluded,
            object_count,
            outline: outline_final,
            size_excluded_outline,
            border_excluded_outline,
            statistics,
        })
    }

    fn check_inputs(
        &self,
        raster: &Raster,
        mask: Option<&Mask>,
        threshold: &Threshold,
    ) -> SegmentResult<()> {
        if let Some(m) = mask.filter(|m| !raster.same_size(m)) {
            return Err(SegmentError::DimensionMismatch {
                expected: raster.dimensions(),
                actual: m.dimensions(),
            });
        }
        if raster.data().iter().any(|v| !v.is_finite()) {
            return Err(SegmentError::InvalidInput("raster has non-finite values".into()));
        }
        threshold.validate(raster)
    }

    /// Split clumps along watershed lines between seeds
    fn declump(
        &self,
        raster: &Raster,
        valid: &Mask,
        labels: &LabelMap,
    ) -> SegmentResult<LabelMap> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.jitter_seed);
        let signal = seed_signal(
            config.unclump_strategy,
            raster,
            valid,
            labels,
            config,
            &mut rng,
        )?;
        let seeds = find_seeds(
            &signal.signal,
            labels,
            config.suppression_radius(),
            config.resize_factor(),
        )?;
        log::trace!("declump: {} seed pixels", seeds.count());
        let cost = cost_surface(
            config.watershed_strategy,
            raster,
            labels,
            signal.distance.as_ref(),
        )?;
        let (split, clusters) = partition(&cost, &seeds, &labels.to_mask())?;
        log::debug!("declump: {} seed clusters", clusters);
        Ok(split)
    }

    fn empty_result(
        &self,
        w: u32,
        h: u32,
        threshold: &Threshold,
    ) -> SegmentResult<SegmentationResult> {
        let empty = LabelMap::new(w, h)?;
        let no_outline = Mask::new(w, h)?;
        let config = &self.config;
        let suppression_size = if config.declumps() {
            config.suppression_radius() as f32
        } else {
            DEFAULT_SUPPRESSION_SIZE
        };
        log::debug!("segment: {}, empty foreground", Stage::Done);
        Ok(SegmentationResult {
            labels: empty.clone(),
            unedited: empty.clone(),
            small_removed: empty.clone(),
            size_excluded: empty.clone(),
            border_excluded: empty,
            object_count: 0,
            outline: no_outline.clone(),
            size_excluded_outline: no_outline.clone(),
            border_excluded_outline: no_outline,
            statistics: SegmentationStatistics {
                threshold: threshold.mean(),
                object_count: 0,
                low_diameter: None,
                high_diameter: None,
                area_covered_percent: 0.0,
                smoothing_filter_size: config.smoothing_filter_size(),
                maxima_suppression_size: suppression_size,
            },
        })
    }
}

impl SegmentationStatistics {
    fn with_areas(mut self, labels: &LabelMap) -> Self {
        let mut areas: Vec<u32> = component_areas(labels)
            .into_iter()
            .skip(1)
            .filter(|&a| a > 0)
            .collect();
        areas.sort_unstable();
        let diameter = |a: u32| 2.0 * (a as f32 / PI).sqrt();
        let n = areas.len();
        if n > 0 {
            self.low_diameter = Some(diameter(areas[n / 10]));
            self.high_diameter = Some(diameter(areas[n * 9 / 10]));
        }
        let covered: u32 = areas.iter().sum();
        if !labels.is_empty() {
            self.area_covered_percent = 100.0 * covered as f32 / labels.len() as f32;
        }
        self
    }
}

/// `before` with the labels that survive in `after` zeroed
fn removed(before: &LabelMap, after: &LabelMap) -> SegmentResult<LabelMap> {
    Ok(before.zip_map(after, |b, a| if a > 0 { 0 } else { b })?)
}

/// Segment `raster` with `config`
///
/// Shorthand for [`Segmenter::new`] followed by [`Segmenter::segment`].
///
/// # Examples
///
/// ```
/// use unclump_core::Raster;
/// use unclump_segment::{SegmentationConfig, segment};
///
/// let raster = Raster::from_fn(40, 40, |x, y| {
///     let d2 = (x as f32 - 20.0).powi(2) + (y as f32 - 20.0).powi(2);
///     if d2 <= 64.0 { 1.0 } else { 0.0 }
/// })
/// .unwrap();
/// let result = segment(&raster, None, 0.5, &SegmentationConfig::default()).unwrap();
/// assert_eq!(result.object_count, 1);
/// ```
pub fn segment(
    raster: &Raster,
    mask: Option<&Mask>,
    threshold: impl Into<Threshold>,
    config: &SegmentationConfig,
) -> SegmentResult<SegmentationResult> {
    Segmenter::new(config.clone())?.segment(raster, mask, threshold)
}
