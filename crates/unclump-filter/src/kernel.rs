//! Convolution kernels
//!
//! Defines the kernel structure used by the convolution routines, plus
//! constructors for the two kernels the pipeline needs: a truncated 1-D
//! Gaussian and a zero-mean Laplacian of Gaussian.

use crate::{FilterError, FilterResult};

/// Gaussian support extends this many standard deviations each side
pub const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// A 2D convolution kernel
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zero kernel with the given dimensions, centered
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "empty kernel: {}x{}",
                width, height
            )));
        }
        Ok(Kernel {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width * height) as usize],
        })
    }

    /// Create a centered kernel from a slice of values
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "data length {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a normalized horizontal 1-D Gaussian kernel
    ///
    /// The half-width is `floor(GAUSSIAN_TRUNCATE * sigma + 0.5)`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` unless `sigma` is finite
    /// and positive.
    pub fn gaussian_1d(sigma: f32) -> FilterResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::InvalidParameters(format!(
                "gaussian sigma must be positive, got {}",
                sigma
            )));
        }
        let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as i32;
        let size = (2 * radius + 1) as u32;
        let two_sigma2 = 2.0 * sigma as f64 * sigma as f64;

        let weights: Vec<f64> = (-radius..=radius)
            .map(|i| (-(i as f64).powi(2) / two_sigma2).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        let data: Vec<f32> = weights.iter().map(|w| (w / total) as f32).collect();

        Self::from_slice(size, 1, &data)
    }

    /// Create a square Laplacian-of-Gaussian kernel
    ///
    /// The kernel spans `2 * (size / 2) + 1` pixels. With `d = (i² + j²) /
    /// (2σ²)`, each weight is `(d - 1) * g` where `g = exp(-d)` normalized
    /// to unit sum; the mean is then subtracted so the kernel sums to zero.
    /// Bright blobs of scale `sigma` give a strongly negative response.
    pub fn laplacian_of_gaussian(size: u32, sigma: f32) -> FilterResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::InvalidParameters(format!(
                "LoG sigma must be positive, got {}",
                sigma
            )));
        }
        let half = (size / 2) as i32;
        let side = (2 * half + 1) as u32;
        let sigma = sigma as f64;

        let mut distance = Vec::with_capacity((side * side) as usize);
        for j in -half..=half {
            for i in -half..=half {
                let (fi, fj) = (i as f64 / sigma, j as f64 / sigma);
                distance.push((fi * fi + fj * fj) / 2.0);
            }
        }
        let gaussian: Vec<f64> = distance.iter().map(|d| (-d).exp()).collect();
        let gsum: f64 = gaussian.iter().sum();
        let log: Vec<f64> = distance
            .iter()
            .zip(&gaussian)
            .map(|(d, g)| (d - 1.0) * g / gsum)
            .collect();
        let mean = log.iter().sum::<f64>() / log.len() as f64;
        let data: Vec<f32> = log.iter().map(|v| (v - mean) as f32).collect();

        Self::from_slice(side, side, &data)
    }

    /// Return the transpose (a horizontal kernel becomes vertical)
    pub fn transposed(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                data[(x * self.height + y) as usize] = self.data[(y * self.width + x) as usize];
            }
        }
        Kernel {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center x coordinate
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center y coordinate
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a kernel element
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Sum of all kernel elements
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
