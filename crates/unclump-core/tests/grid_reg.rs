//! Grid regression test
//!
//! Tests grid creation, pixel access, size checks and the raster
//! statistics used by the filters (extrema, stretching, Otsu).
//!
//! Run with:
//! ```
//! cargo test -p unclump-core --test grid_reg
//! ```

use unclump_core::{Grid, LabelMap, Mask, Raster, otsu_masked};
use unclump_test::RegParams;

// ==========================================================================
// Test 1: creation and access
// ==========================================================================

#[test]
fn grid_reg_creation() {
    let mut rp = RegParams::new("grid_creation");

    let raster = Raster::new(640, 480).expect("Raster::new failed");
    rp.compare_values(640.0, raster.width() as f64, 0.0);
    rp.compare_values(480.0, raster.height() as f64, 0.0);
    rp.check(raster.data().iter().all(|&v| v == 0.0), "new raster is zero");

    let mask = Mask::new_with_value(10, 10, true).expect("Mask::new_with_value failed");
    rp.compare_values(100.0, mask.count() as f64, 0.0);
    rp.check(mask.all(), "all-true mask");

    let labels = LabelMap::from_data(3, 2, vec![0, 1, 2, 3, 4, 5]).expect("from_data failed");
    rp.compare_values(5.0, labels.get(2, 1).unwrap() as f64, 0.0);
    rp.compare_values(5.0, labels.max_label() as f64, 0.0);

    rp.check(Raster::new(0, 100).is_err(), "zero width rejected");
    rp.check(
        Grid::<u32>::from_data(2, 2, vec![1, 2, 3]).is_err(),
        "short data rejected",
    );

    assert!(rp.cleanup(), "grid_reg creation tests failed");
}

// ==========================================================================
// Test 2: statistics
// ==========================================================================

#[test]
fn grid_reg_statistics() {
    let mut rp = RegParams::new("grid_statistics");

    let raster = Raster::from_fn(10, 10, |x, y| (x + y) as f32).unwrap();
    let (lo, hi) = raster.min_max(None).unwrap();
    rp.compare_values(0.0, lo as f64, 0.0);
    rp.compare_values(18.0, hi as f64, 0.0);
    rp.compare_values(9.0, raster.mean() as f64, 1e-5);

    let stretched = raster.stretch(None).unwrap();
    rp.compare_values(0.0, stretched.get(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(1.0, stretched.get(9, 9).unwrap() as f64, 0.0);
    rp.compare_values(0.5, stretched.get(9, 0).unwrap() as f64, 1e-6);

    // Left half dark, right half bright; Otsu must split between them
    let bimodal = Raster::from_fn(20, 10, |x, _| if x < 10 { 0.2 } else { 0.8 }).unwrap();
    let mask = Mask::new_with_value(20, 10, true).unwrap();
    let t = otsu_masked(&bimodal, &mask, 0.0, 1.0, 256).unwrap();
    rp.check(t >= 0.2 && t < 0.8, "otsu splits bimodal raster");

    let bad = Mask::new(5, 5).unwrap();
    rp.check(otsu_masked(&bimodal, &bad, 0.0, 1.0, 256).is_err(), "size mismatch");

    assert!(rp.cleanup(), "grid_reg statistics tests failed");
}
