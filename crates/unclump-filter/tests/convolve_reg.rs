//! Smoothing and blob filter regression test
//!
//! Exercises the masked Gaussian smoothing, the LoG blob filter and the
//! maximum filter on the synthetic touching-blob raster.
//!
//! Run with:
//! ```
//! cargo test -p unclump-filter --test convolve_reg
//! ```

use unclump_core::{Mask, Raster};
use unclump_filter::{
    gaussian_blur, laplacian_of_gaussian, masked_gaussian_blur, max_filter, resample_bilinear,
    resample_nearest, smooth,
};
use unclump_morph::Sel;
use unclump_test::RegParams;
use unclump_test::synthetic::{BLOB_CENTERS, BLOBS_HEIGHT, BLOBS_WIDTH, touching_blobs};

#[test]
fn convolve_reg() {
    let mut rp = RegParams::new("convolve");

    let raster = touching_blobs().expect("build blobs");
    let full = Mask::new_with_value(BLOBS_WIDTH, BLOBS_HEIGHT, true).unwrap();

    // ---- Test 1: full mask smoothing matches plain blur away from edges ----
    let plain = gaussian_blur(&raster, 2.0).unwrap();
    let masked = masked_gaussian_blur(&raster, &full, 2.0).unwrap();
    let centres: Vec<(u32, u32)> = BLOB_CENTERS
        .iter()
        .map(|&(x, y)| (x as u32, y as u32))
        .collect();
    let (cx, cy) = centres[0];
    rp.compare_values(
        plain.get(cx, cy).unwrap() as f64,
        masked.get(cx, cy).unwrap() as f64,
        1e-5,
    );

    // ---- Test 2: smoothing keeps the blob peaks as the brightest pixels ----
    let smoothed = smooth(&raster, Some(&full), 2.0).unwrap();
    for &(x, y) in &centres {
        let centre = smoothed.get(x, y).unwrap();
        let side = smoothed.get(x + 5, y).unwrap();
        rp.check(centre > side, "smoothed peak brighter than its flank");
    }

    // ---- Test 3: the identity at sigma 0 ----
    let same = smooth(&raster, Some(&full), 0.0).unwrap();
    rp.compare_grids(&raster, &same);

    // ---- Test 4: LoG of the inverted blobs is positive at their centres ----
    let inverted: Raster = raster.map(|v| 1.0 - v);
    let log = laplacian_of_gaussian(&inverted, &full, 12, 4.0).unwrap();
    let response = log.map(|v| -v);
    let peaks = max_filter(&response, &Sel::create_disk(7).unwrap()).unwrap();
    for &(x, y) in &centres {
        // inverted blobs are dark, so the LoG response there is positive
        rp.check(log.get(x, y).unwrap() > 0.0, "LoG positive on dark blob");
        rp.check(
            peaks.get(x, y).unwrap() >= response.get(x, y).unwrap(),
            "max filter bounds the response",
        );
    }

    // ---- Test 5: downsample then upsample keeps the rough shape ----
    let factor = 0.5f32;
    let sw = (BLOBS_WIDTH as f32 * factor + 1.0) as u32;
    let sh = (BLOBS_HEIGHT as f32 * factor + 1.0) as u32;
    let small = resample_bilinear(&raster, sw, sh, factor).unwrap();
    let back = resample_bilinear(&small, BLOBS_WIDTH, BLOBS_HEIGHT, 1.0 / factor).unwrap();
    rp.compare_values(
        raster.get(cx, cy).unwrap() as f64,
        back.get(cx, cy).unwrap() as f64,
        0.05,
    );

    let foreground = raster.map(|v| v > 0.5);
    let coarse = resample_nearest(&foreground, sw, sh).unwrap();
    let restored = resample_nearest(&coarse, BLOBS_WIDTH, BLOBS_HEIGHT).unwrap();
    rp.check(restored.get(cx, cy) == Some(true), "nearest keeps the blob centre");
    rp.check(restored.get(0, 0) == Some(false), "nearest keeps the background");

    assert!(rp.cleanup(), "convolve regression test failed");
}
