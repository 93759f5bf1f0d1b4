//! Segmentation configuration
//!
//! [`SegmentationConfig`] holds every tunable of the pipeline. It can be
//! built in code with the `with_*` methods or loaded from TOML:
//!
//! ```toml
//! min_diameter = 12.0
//! max_diameter = 60.0
//! unclump_strategy = "shape"
//! watershed_strategy = "distance"
//! smoothing_size = "auto"
//! maxima_suppression_size = { manual = 9.0 }
//! ```
//!
//! Keys that are left out take their default values.

use crate::error::{SegmentError, SegmentResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// FWHM to sigma conversion for Gaussian smoothing sizes
pub const FWHM_PER_SIGMA: f32 = 2.35;

/// Maxima suppression radius used at reduced resolution, and reported when
/// declumping is skipped
pub const DEFAULT_SUPPRESSION_SIZE: f32 = 7.0;

/// Objects are searched for maxima at this diameter when `low_res_maxima`
/// shrinks the image
const LOW_RES_TARGET_DIAMETER: f32 = 10.0;

/// A size that is either derived from the object diameters or set by hand
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSetting {
    /// Derive the value from the configured object diameters
    #[default]
    Auto,
    /// Use this value
    Manual(f32),
}

impl SizeSetting {
    /// The manual value, if any
    pub fn manual(self) -> Option<f32> {
        match self {
            SizeSetting::Auto => None,
            SizeSetting::Manual(v) => Some(v),
        }
    }

    /// The manual value, or `auto` computed lazily
    pub fn resolve(self, auto: impl FnOnce() -> f32) -> f32 {
        self.manual().unwrap_or_else(auto)
    }
}

/// Signal used to find one seed per object in a clump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnclumpStrategy {
    /// Do not split clumps
    None,
    /// Peaks of the smoothed intensity
    #[default]
    Intensity,
    /// Peaks of the distance transform of the foreground
    Shape,
    /// Peaks of a Laplacian-of-Gaussian blob response
    Log,
}

/// Cost surface the watershed floods to draw lines between seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatershedStrategy {
    /// Do not split clumps
    None,
    /// Dividing lines follow dim valleys of the raster
    #[default]
    Intensity,
    /// Dividing lines follow the necks of the foreground shape
    Distance,
}

/// Options for [`segment`](crate::segment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Smallest expected object diameter in pixels
    pub min_diameter: f32,
    /// Largest expected object diameter in pixels
    pub max_diameter: f32,
    /// Remove objects whose area is outside the diameter range
    pub discard_by_size: bool,
    /// Remove objects touching the raster edge (or the mask rim)
    pub discard_border_objects: bool,
    /// Fill background holes enclosed by a single object
    pub fill_holes: bool,
    /// How seeds are found
    pub unclump_strategy: UnclumpStrategy,
    /// What the watershed floods
    pub watershed_strategy: WatershedStrategy,
    /// Gaussian smoothing filter size (FWHM) before maxima detection
    pub smoothing_size: SizeSetting,
    /// Radius of the neighbourhood in which only one maximum survives
    pub maxima_suppression_size: SizeSetting,
    /// Search for maxima on a reduced-resolution copy for large objects
    pub low_res_maxima: bool,
    /// Blob diameter for the LoG strategy
    pub log_diameter: SizeSetting,
    /// Threshold on the stretched LoG response in `[0, 1]`
    pub log_threshold: SizeSetting,
    /// Seed of the generator that jitters the distance transform
    pub jitter_seed: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_diameter: 10.0,
            max_diameter: 40.0,
            discard_by_size: true,
            discard_border_objects: true,
            fill_holes: true,
            unclump_strategy: UnclumpStrategy::Intensity,
            watershed_strategy: WatershedStrategy::Intensity,
            smoothing_size: SizeSetting::Auto,
            maxima_suppression_size: SizeSetting::Auto,
            low_res_maxima: true,
            log_diameter: SizeSetting::Auto,
            log_threshold: SizeSetting::Auto,
            jitter_seed: 0,
        }
    }
}

impl SegmentationConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected object diameter range
    pub fn with_diameter_range(mut self, min: f32, max: f32) -> Self {
        self.min_diameter = min;
        self.max_diameter = max;
        self
    }

    /// Enable or disable the size filter
    pub fn with_discard_by_size(mut self, discard: bool) -> Self {
        self.discard_by_size = discard;
        self
    }

    /// Enable or disable the border filter
    pub fn with_discard_border_objects(mut self, discard: bool) -> Self {
        self.discard_border_objects = discard;
        self
    }

    /// Enable or disable hole filling
    pub fn with_fill_holes(mut self, fill: bool) -> Self {
        self.fill_holes = fill;
        self
    }

    /// Set the seed strategy
    pub fn with_unclump_strategy(mut self, strategy: UnclumpStrategy) -> Self {
        self.unclump_strategy = strategy;
        self
    }

    /// Set the watershed strategy
    pub fn with_watershed_strategy(mut self, strategy: WatershedStrategy) -> Self {
        self.watershed_strategy = strategy;
        self
    }

    /// Set the smoothing filter size
    pub fn with_smoothing_size(mut self, size: SizeSetting) -> Self {
        self.smoothing_size = size;
        self
    }

    /// Set the maxima suppression size
    pub fn with_maxima_suppression_size(mut self, size: SizeSetting) -> Self {
        self.maxima_suppression_size = size;
        self
    }

    /// Enable or disable low-resolution maxima search
    pub fn with_low_res_maxima(mut self, low_res: bool) -> Self {
        self.low_res_maxima = low_res;
        self
    }

    /// Set the LoG blob diameter
    pub fn with_log_diameter(mut self, diameter: SizeSetting) -> Self {
        self.log_diameter = diameter;
        self
    }

    /// Set the LoG response threshold
    pub fn with_log_threshold(mut self, threshold: SizeSetting) -> Self {
        self.log_threshold = threshold;
        self
    }

    /// Set the jitter generator seed
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    /// Check that every value is in range
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::Config` naming the first offending value.
    pub fn validate(&self) -> SegmentResult<()> {
        if !(self.min_diameter.is_finite() && self.min_diameter >= 1.0) {
            return Err(SegmentError::Config(format!(
                "min_diameter must be at least 1, got {}",
                self.min_diameter
            )));
        }
        if !(self.max_diameter.is_finite() && self.max_diameter >= self.min_diameter) {
            return Err(SegmentError::Config(format!(
                "max_diameter ({}) must not be below min_diameter ({})",
                self.max_diameter, self.min_diameter
            )));
        }
        let manual = [
            ("smoothing_size", self.smoothing_size),
            ("maxima_suppression_size", self.maxima_suppression_size),
            ("log_diameter", self.log_diameter),
            ("log_threshold", self.log_threshold),
        ];
        for (name, setting) in manual {
            if let Some(v) = setting.manual().filter(|v| !(v.is_finite() && *v >= 0.0)) {
                return Err(SegmentError::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    name, v
                )));
            }
        }
        let radius = self.suppression_radius();
        if let Some(v) = self.maxima_suppression_size.manual().filter(|_| radius == 0) {
            return Err(SegmentError::Config(format!(
                "maxima_suppression_size {} gives a suppression radius of 0 \
                 at resize factor {}",
                v,
                self.resize_factor()
            )));
        }
        if let Some(v) = self.log_diameter.manual().filter(|v| *v < 1.0) {
            return Err(SegmentError::Config(format!(
                "log_diameter must be at least 1, got {}",
                v
            )));
        }
        if let Some(v) = self.log_threshold.manual().filter(|v| *v > 1.0) {
            return Err(SegmentError::Config(format!(
                "log_threshold must be in [0, 1], got {}",
                v
            )));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> SegmentResult<Self> {
        toml::from_str(text).map_err(|e| SegmentError::Config(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> SegmentResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| SegmentError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> SegmentResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Whether the seed detector and watershed run at all
    pub fn declumps(&self) -> bool {
        self.unclump_strategy != UnclumpStrategy::None
            && self.watershed_strategy != WatershedStrategy::None
    }

    /// Gaussian smoothing filter size (FWHM in pixels)
    pub fn smoothing_filter_size(&self) -> f32 {
        self.smoothing_size
            .resolve(|| FWHM_PER_SIGMA * self.min_diameter / 3.5)
    }

    /// Scale at which maxima are searched: below 1 when `low_res_maxima`
    /// shrinks large objects to a diameter of 10
    pub fn resize_factor(&self) -> f32 {
        if self.low_res_maxima && self.min_diameter > LOW_RES_TARGET_DIAMETER {
            LOW_RES_TARGET_DIAMETER / self.min_diameter
        } else {
            1.0
        }
    }

    /// Disk radius for maxima suppression, at the search resolution
    pub fn suppression_radius(&self) -> u32 {
        let factor = self.resize_factor();
        let radius = if factor < 1.0 {
            match self.maxima_suppression_size {
                SizeSetting::Auto => DEFAULT_SUPPRESSION_SIZE,
                SizeSetting::Manual(v) => (v * factor + 0.5).floor(),
            }
        } else {
            match self.maxima_suppression_size {
                SizeSetting::Auto => (self.min_diameter / 1.5 + 0.5).floor(),
                SizeSetting::Manual(v) => v.floor(),
            }
        };
        radius.max(0.0) as u32
    }

    /// Blob diameter for the LoG strategy at full resolution
    pub fn effective_log_diameter(&self) -> f32 {
        self.log_diameter.resolve(|| {
            let (lo, hi) = (self.min_diameter, self.max_diameter);
            (hi.min(lo * lo) + 5.0 * lo) / 6.0
        })
    }
}
