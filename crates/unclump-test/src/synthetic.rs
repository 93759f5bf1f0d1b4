//! Synthetic test rasters
//!
//! Painters draw into an existing raster and never lower a pixel, so
//! overlapping shapes keep the brightest value.

use crate::error::{TestError, TestResult};
use unclump_core::{LabelMap, Mask, Raster};

/// Width of the touching-blob raster
pub const BLOBS_WIDTH: u32 = 60;
/// Height of the touching-blob raster
pub const BLOBS_HEIGHT: u32 = 40;
/// Radius of each touching blob
pub const BLOB_RADIUS: f32 = 10.0;
/// Blob centres; their disks leave a 2 pixel gap on the centre row
pub const BLOB_CENTERS: [(f32, f32); 2] = [(17.0, 20.0), (40.0, 20.0)];
/// Peak intensity at a blob centre
pub const BLOB_PEAK: f32 = 1.0;
/// Intensity at a blob rim
pub const BLOB_RIM: f32 = 0.7;
/// Intensity of the dim bridge joining the blobs
pub const BRIDGE_LEVEL: f32 = 0.4;
/// Threshold that keeps blobs and bridge but drops background
pub const BLOBS_THRESHOLD: f32 = 0.35;

/// All-zero raster
pub fn blank(width: u32, height: u32) -> TestResult<Raster> {
    Raster::new(width, height).map_err(|e| TestError::ImageBuild {
        name: "blank".into(),
        message: e.to_string(),
    })
}

/// Paint a disk whose intensity falls parabolically from `peak` at the
/// centre to `rim` at `radius`
pub fn paint_disk(raster: &mut Raster, cx: f32, cy: f32, radius: f32, peak: f32, rim: f32) {
    let r2 = radius * radius;
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d2 = dx * dx + dy * dy;
            if d2 <= r2 {
                let value = peak - (peak - rim) * d2 / r2;
                let old = raster.get_unchecked(x, y);
                raster.set_unchecked(x, y, old.max(value));
            }
        }
    }
}

/// Paint the inclusive rectangle `[x0, x1] x [y0, y1]` with `value`
pub fn paint_rect(raster: &mut Raster, x0: u32, y0: u32, x1: u32, y1: u32, value: f32) {
    for y in y0..=y1.min(raster.height() - 1) {
        for x in x0..=x1.min(raster.width() - 1) {
            let old = raster.get_unchecked(x, y);
            raster.set_unchecked(x, y, old.max(value));
        }
    }
}

/// Two bright blobs joined by a dim bridge across a 2 pixel gap
pub fn touching_blobs() -> TestResult<Raster> {
    let mut raster = blank(BLOBS_WIDTH, BLOBS_HEIGHT)?;
    for &(cx, cy) in &BLOB_CENTERS {
        paint_disk(&mut raster, cx, cy, BLOB_RADIUS, BLOB_PEAK, BLOB_RIM);
    }
    paint_rect(&mut raster, 25, 18, 32, 22, BRIDGE_LEVEL);
    Ok(raster)
}

/// Double-size [`touching_blobs`]: radius 20 blobs, still 2 pixels apart
///
/// Large enough that a minimum diameter of 20 moves the maxima search to
/// half resolution.
pub fn large_touching_blobs() -> TestResult<Raster> {
    let mut raster = blank(2 * BLOBS_WIDTH, 2 * BLOBS_HEIGHT)?;
    for (cx, cy) in [(34.0, 40.0), (77.0, 40.0)] {
        paint_disk(&mut raster, cx, cy, 2.0 * BLOB_RADIUS, BLOB_PEAK, BLOB_RIM);
    }
    paint_rect(&mut raster, 50, 37, 61, 43, BRIDGE_LEVEL);
    Ok(raster)
}

/// Number of lattice points inside a disk of `radius`
pub fn disk_area(radius: f32) -> usize {
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    let mut count = 0;
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f32 <= r2 {
                count += 1;
            }
        }
    }
    count
}

/// Mask from an ASCII picture; `#` and `x` are `true`
///
/// Rows are separated by newlines; surrounding whitespace is ignored.
pub fn mask_from_ascii(picture: &str) -> TestResult<Mask> {
    let rows: Vec<&str> = picture
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
    let data: Vec<bool> = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| c == '#' || c == 'x'))
        .collect();
    Mask::from_data(width, height, data).map_err(TestError::from)
}

/// Label map from an ASCII picture; digits are labels, `.` is background
pub fn labels_from_ascii(picture: &str) -> TestResult<LabelMap> {
    let rows: Vec<&str> = picture
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
    let data: Vec<u32> = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| c.to_digit(10).unwrap_or(0)))
        .collect();
    LabelMap::from_data(width, height, data).map_err(TestError::from)
}
