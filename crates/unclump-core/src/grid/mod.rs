//! Grid - Fixed-size 2-D array
//!
//! `Grid<T>` is the storage type behind every image in the pipeline:
//! intensities ([`Raster`]), validity flags ([`Mask`]) and object labels
//! ([`LabelMap`]). See [`raster`] for the statistics that only make sense
//! on real-valued grids and [`mask`] for boolean helpers.
//!
//! # Examples
//!
//! ```
//! use unclump_core::Grid;
//!
//! let mut grid: Grid<u32> = Grid::new(4, 3).unwrap();
//! grid.set(1, 2, 7).unwrap();
//! assert_eq!(grid.get(1, 2), Some(7));
//! assert_eq!(grid.get(4, 0), None);
//! ```

pub mod mask;
pub mod raster;

use crate::error::{Error, Result};

/// Real-valued intensity image
pub type Raster = Grid<f32>;

/// Boolean image; `true` marks a valid (or foreground) pixel
pub type Mask = Grid<bool>;

/// Object label image; `0` is background
pub type LabelMap = Grid<u32>;

/// Fixed-size 2-D array
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The element at
/// (x, y) is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a new grid with every element set to `T::default()`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, T::default())
    }
}

impl<T: Copy> Grid<T> {
    /// Create a new grid with every element set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use unclump_core::Raster;
    ///
    /// let raster = Raster::new_with_value(10, 10, 0.5).unwrap();
    /// assert_eq!(raster.get(5, 5), Some(0.5));
    /// ```
    pub fn new_with_value(width: u32, height: u32, value: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Grid {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a grid from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(Grid {
            width,
            height,
            data,
        })
    }

    /// Create a grid by evaluating `f(x, y)` at every position
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }

        Ok(Grid {
            width,
            height,
            data,
        })
    }

    /// Get the grid width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the grid height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the grid dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a grid has at least one element
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major index of (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Position of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Get the element at (x, y), or `None` outside the grid
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get the element at signed coordinates, or `None` outside the grid
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as u32, y as u32)
    }

    /// Get the element at (x, y) without bounds checking against the width
    ///
    /// Panics if the computed index is past the end of the data.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> T {
        self.data[self.index(x, y)]
    }

    /// Set the element at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if (x, y) lies outside the grid.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: self.index(x, y),
                len: self.data.len(),
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Set the element at (x, y) without bounds checking against the width
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Set every element to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Get the raw data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the raw data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Get one row of the grid
    pub fn row(&self, y: u32) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some(&self.data[start..start + self.width as usize])
    }

    /// Apply `f` to every element, producing a grid of the same size
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Combine two grids of the same size elementwise
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the sizes differ.
    pub fn zip_map<U: Copy, V: Copy>(
        &self,
        other: &Grid<U>,
        mut f: impl FnMut(T, U) -> V,
    ) -> Result<Grid<V>> {
        self.check_same_size(other)?;
        Ok(Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Check if another grid has the same dimensions
    pub fn same_size<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Return an error unless another grid has the same dimensions
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` carrying both sizes.
    pub fn check_same_size<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.same_size(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: (other.width, other.height),
            })
        }
    }

    /// Check whether (x, y) lies on the outermost row or column
    #[inline]
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }
}

impl Grid<u32> {
    /// Largest label present, 0 for an all-background map
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Foreground mask of a label map (`label > 0`)
    pub fn to_mask(&self) -> Mask {
        self.map(|v| v > 0)
    }
}
