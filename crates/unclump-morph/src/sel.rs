//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations and in footprint-based rank filters.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Don't care - this position is ignored
    #[default]
    DontCare = 0,
    /// Hit - part of the footprint
    Hit = 1,
}

/// Structuring Element (SEL)
///
/// Defines the neighborhood pattern for morphological operations.
/// The origin (cx, cy) is the reference point for the operation.
#[derive(Debug, Clone)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<SelElement>,
}

impl Sel {
    /// Create a new structuring element of don't-care elements, with the
    /// origin at the center
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "empty structuring element: {}x{}",
                width, height
            )));
        }
        Ok(Sel {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![SelElement::DontCare; (width * height) as usize],
        })
    }

    /// Create a rectangular "brick" structuring element with all hits
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.data.fill(SelElement::Hit);
        Ok(sel)
    }

    /// Create a square structuring element with all hits
    pub fn create_square(size: u32) -> MorphResult<Self> {
        Self::create_brick(size, size)
    }

    /// Create a cross (+) structuring element
    ///
    /// `create_cross(3)` is the 4-connected neighborhood.
    pub fn create_cross(size: u32) -> MorphResult<Self> {
        let mut sel = Self::new(size, size)?;
        let (cx, cy) = (sel.cx, sel.cy);
        for i in 0..size {
            sel.set_element(cx, i, SelElement::Hit);
            sel.set_element(i, cy, SelElement::Hit);
        }
        Ok(sel)
    }

    /// Create a disk structuring element
    ///
    /// The footprint is every offset with `dx² + dy² <= radius²`, in a
    /// `(2·radius + 1)` square centered on the origin.
    ///
    /// # Examples
    ///
    /// ```
    /// use unclump_morph::Sel;
    ///
    /// let disk = Sel::create_disk(1).unwrap();
    /// assert_eq!(disk.width(), 3);
    /// assert_eq!(disk.hit_count(), 5);
    /// ```
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let size = 2 * radius + 1;
        let mut sel = Self::new(size, size)?;
        let r = radius as i64;
        for y in 0..size {
            for x in 0..size {
                let dx = x as i64 - r;
                let dy = y as i64 - r;
                if dx * dx + dy * dy <= r * r {
                    sel.set_element(x, y, SelElement::Hit);
                }
            }
        }
        Ok(sel)
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

    /// Get the origin x coordinate
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Get an element at (x, y)
    #[inline]
    pub fn get_element(&self, x: u32, y: u32) -> Option<SelElement> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set an element at (x, y); positions outside the SEL are ignored
    #[inline]
    pub fn set_element(&mut self, x: u32, y: u32, elem: SelElement) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = elem;
        }
    }

    /// Get raw element data
    pub fn data(&self) -> &[SelElement] {
        &self.data
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Hit).count()
    }

    /// Iterate over hit positions relative to origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.data
            .iter()
            .enumerate()
            .filter_map(move |(idx, &elem)| {
                if elem == SelElement::Hit {
                    let x = (idx as u32 % width) as i32;
                    let y = (idx as u32 / width) as i32;
                    Some((x - cx, y - cy))
                } else {
                    None
                }
            })
    }
}
