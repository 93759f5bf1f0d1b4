//! Boolean grid helpers

use super::{Grid, Mask};
use crate::error::Result;

impl Grid<bool> {
    /// Number of `true` pixels
    pub fn count(&self) -> usize {
        self.data().iter().filter(|&&v| v).count()
    }

    /// Check whether every pixel is `true`
    pub fn all(&self) -> bool {
        self.data().iter().all(|&v| v)
    }

    /// Check whether any pixel is `true`
    pub fn any(&self) -> bool {
        self.data().iter().any(|&v| v)
    }

    /// Logical complement
    pub fn not(&self) -> Mask {
        self.map(|v| !v)
    }

    /// Elementwise AND
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the sizes differ.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.zip_map(other, |a, b| a && b)
    }

    /// Elementwise AND NOT (`self & !other`)
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the sizes differ.
    pub fn and_not(&self, other: &Mask) -> Result<Mask> {
        self.zip_map(other, |a, b| a && !b)
    }

    /// Cast to a real-valued grid (`1.0` for `true`)
    pub fn to_raster(&self) -> Grid<f32> {
        self.map(|v| if v { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_logic() {
        let a = Mask::from_data(2, 2, vec![true, true, false, false]).unwrap();
        let b = Mask::from_data(2, 2, vec![true, false, true, false]).unwrap();
        assert_eq!(a.count(), 2);
        assert!(a.any());
        assert!(!a.all());
        assert_eq!(a.and(&b).unwrap().data(), &[true, false, false, false]);
        assert_eq!(a.and_not(&b).unwrap().data(), &[false, true, false, false]);
        assert_eq!(a.not().count(), 2);
        assert_eq!(b.to_raster().data(), &[1.0, 0.0, 1.0, 0.0]);
    }
}
