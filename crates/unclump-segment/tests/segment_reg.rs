//! Segmentation pipeline regression test
//!
//! Runs the full pipeline on synthetic rasters: touching blobs split by
//! the intensity watershed, the same blobs left fused without declumping,
//! a too-small object, an object cut by the raster edge, and a blank
//! raster. Every seed strategy is run at full and at half resolution.
//! Also checks determinism and dense relabeling.
//!
//! Run with:
//! ```
//! cargo test -p unclump-segment --test segment_reg
//! ```

use std::collections::BTreeSet;
use std::f64::consts::PI;
use unclump_core::{LabelMap, Mask, Raster};
use unclump_region::{ConnectivityType, component_areas, label_connected_components};
use unclump_segment::{
    SegmentationConfig, SegmentationResult, Segmenter, UnclumpStrategy, WatershedStrategy, segment,
};
use unclump_test::RegParams;
use unclump_test::synthetic::{
    BLOBS_THRESHOLD, blank, large_touching_blobs, paint_disk, paint_rect, touching_blobs,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Labels are exactly `1..=n` and each one is a single 8-connected region
fn is_dense(labels: &LabelMap, n: u32) -> bool {
    let present: BTreeSet<u32> = labels.data().iter().copied().filter(|&v| v > 0).collect();
    if present != (1..=n).collect::<BTreeSet<u32>>() {
        return false;
    }
    present.iter().all(|&label| {
        let single = labels.map(|v| v == label);
        let (_, parts) = label_connected_components(&single, ConnectivityType::EightWay).unwrap();
        parts == 1
    })
}

/// Two objects, each within 10% of a disk of `radius`
fn check_split(rp: &mut RegParams, result: &SegmentationResult, radius: f64, name: &str) {
    let areas = component_areas(&result.labels);
    eprintln!("  {} areas: {:?}", name, areas.get(1..).unwrap_or(&[]));
    let disk = PI * radius * radius;
    rp.compare_values(2.0, result.object_count as f64, 0.0);
    for label in 1..=2 {
        let area = areas.get(label).copied().unwrap_or(0) as f64;
        rp.compare_values(disk, area, disk * 0.1);
    }
    rp.check(is_dense(&result.labels, result.object_count), name);
}

#[test]
fn segment_reg() {
    init_logger();
    let mut rp = RegParams::new("segment");
    let blobs = touching_blobs().expect("touching_blobs failed");
    let disk = PI * 100.0;

    // ---- Test 1: two touching blobs are split ----
    let config = SegmentationConfig::default()
        .with_unclump_strategy(UnclumpStrategy::Intensity)
        .with_watershed_strategy(WatershedStrategy::Intensity)
        .with_diameter_range(10.0, 40.0);
    let split = segment(&blobs, None, BLOBS_THRESHOLD, &config).expect("segment failed");
    let areas = component_areas(&split.labels);
    eprintln!("  split areas: {:?}", &areas[1..]);
    rp.compare_values(2.0, split.object_count as f64, 0.0);
    rp.compare_values(disk, areas[1] as f64, disk * 0.1);
    rp.compare_values(disk, areas[2] as f64, disk * 0.1);
    rp.check(is_dense(&split.labels, split.object_count), "split labels dense");
    rp.compare_values(0.35, split.statistics.threshold as f64, 1e-6);
    rp.write_labels_and_check(&split.labels).expect("write labels failed");

    // ---- Test 2: without declumping the blobs stay fused ----
    let fused_config = config.clone().with_unclump_strategy(UnclumpStrategy::None);
    let fused = segment(&blobs, None, BLOBS_THRESHOLD, &fused_config).expect("segment failed");
    let fused_areas = component_areas(&fused.labels);
    eprintln!("  fused area: {:?}", &fused_areas[1..]);
    rp.compare_values(1.0, fused.object_count as f64, 0.0);
    rp.check(fused_areas[1] as f64 > 1.5 * disk, "fused area covers both blobs");
    rp.compare_values(7.0, fused.statistics.maxima_suppression_size as f64, 0.0);

    // ---- Test 3: determinism ----
    let again = segment(&blobs, None, BLOBS_THRESHOLD, &config).unwrap();
    rp.compare_grids(&split.labels, &again.labels);
    let shape_config = config
        .clone()
        .with_unclump_strategy(UnclumpStrategy::Shape)
        .with_watershed_strategy(WatershedStrategy::Distance);
    let shape_a = segment(&blobs, None, BLOBS_THRESHOLD, &shape_config).unwrap();
    let shape_b = segment(&blobs, None, BLOBS_THRESHOLD, &shape_config).unwrap();
    rp.compare_grids(&shape_a.labels, &shape_b.labels);
    check_split(&mut rp, &shape_a, 10.0, "shape");

    // ---- Test 4: per-pixel threshold equal to the global one ----
    let flat = Raster::new_with_value(blobs.width(), blobs.height(), BLOBS_THRESHOLD).unwrap();
    let per_pixel = segment(&blobs, None, flat, &config).unwrap();
    rp.compare_grids(&split.labels, &per_pixel.labels);

    // ---- Test 5: LoG seeds run end to end ----
    let log_config = config.clone().with_unclump_strategy(UnclumpStrategy::Log);
    let log_result = segment(&blobs, None, BLOBS_THRESHOLD, &log_config).unwrap();
    check_split(&mut rp, &log_result, 10.0, "log");

    assert!(rp.cleanup(), "segment regression test failed");
}

#[test]
fn segment_low_res_reg() {
    init_logger();
    let mut rp = RegParams::new("segment_low_res");
    let blobs = large_touching_blobs().expect("large_touching_blobs failed");

    // a minimum diameter of 20 halves the maxima search scale
    let config = SegmentationConfig::default().with_diameter_range(20.0, 60.0);
    rp.compare_values(0.5, config.resize_factor() as f64, 0.0);

    let runs = [
        (UnclumpStrategy::Intensity, WatershedStrategy::Intensity, "intensity"),
        (UnclumpStrategy::Shape, WatershedStrategy::Distance, "shape"),
        (UnclumpStrategy::Log, WatershedStrategy::Intensity, "log"),
    ];
    for (unclump, watershed, name) in runs {
        let run_config = config
            .clone()
            .with_unclump_strategy(unclump)
            .with_watershed_strategy(watershed);
        let result = segment(&blobs, None, BLOBS_THRESHOLD, &run_config).expect("segment failed");
        check_split(&mut rp, &result, 20.0, name);
    }

    // the same run at full resolution agrees on the object count
    let full = config.with_low_res_maxima(false);
    let result = segment(&blobs, None, BLOBS_THRESHOLD, &full).expect("segment failed");
    check_split(&mut rp, &result, 20.0, "full resolution");

    assert!(rp.cleanup(), "segment low-res regression test failed");
}

#[test]
fn segment_filters_reg() {
    init_logger();
    let mut rp = RegParams::new("segment_filters");
    let config = SegmentationConfig::default();

    // ---- Test 1: object of 20 pixels is below the minimum area ----
    let mut small = blank(30, 30).unwrap();
    paint_rect(&mut small, 12, 12, 16, 15, 1.0);
    let result = segment(&small, None, 0.5, &config).expect("segment failed");
    rp.compare_values(0.0, result.object_count as f64, 0.0);
    rp.check(result.labels.data().iter().all(|&v| v == 0), "final map empty");
    rp.check(
        result.small_removed.data().iter().all(|&v| v == 0),
        "small-removed map empty",
    );
    rp.check(result.unedited.data().iter().any(|&v| v > 0), "unedited keeps object");
    rp.check(result.size_excluded_outline.any(), "size-excluded outline drawn");

    // ---- Test 2: object on row 0 is removed by the border filter ----
    let mut edge = blank(40, 30).unwrap();
    paint_rect(&mut edge, 10, 0, 19, 9, 1.0);
    let no_size = config.clone().with_discard_by_size(false);
    let result = segment(&edge, None, 0.5, &no_size).expect("segment failed");
    rp.compare_values(0.0, result.object_count as f64, 0.0);
    rp.check(result.border_excluded_outline.any(), "border-excluded outline drawn");
    rp.check(
        result.border_excluded.data().iter().any(|&v| v > 0),
        "border-excluded map keeps object",
    );

    let kept = segment(&edge, None, 0.5, &no_size.clone().with_discard_border_objects(false))
        .expect("segment failed");
    rp.check(kept.object_count >= 1, "border filter disabled keeps object");

    // ---- Test 3: blank raster gives nothing ----
    let zero = blank(25, 25).unwrap();
    let result = segment(&zero, None, 0.1, &config).expect("segment failed");
    rp.compare_values(0.0, result.object_count as f64, 0.0);
    rp.check(!result.outline.any(), "no final outline");
    rp.check(!result.size_excluded_outline.any(), "no size outline");
    rp.check(!result.border_excluded_outline.any(), "no border outline");

    // ---- Test 4: relabeling closes gaps left by removed objects ----
    // the small middle disk takes label 2 before the size filter
    let mut three = blank(64, 30).unwrap();
    paint_disk(&mut three, 8.0, 15.0, 6.0, 1.0, 1.0);
    paint_disk(&mut three, 32.0, 15.0, 2.0, 1.0, 1.0);
    paint_disk(&mut three, 54.0, 15.0, 6.0, 1.0, 1.0);
    let result = segment(&three, None, 0.5, &config).expect("segment failed");
    rp.compare_values(3.0, result.unedited.max_label() as f64, 0.0);
    rp.compare_values(2.0, result.object_count as f64, 0.0);
    rp.check(is_dense(&result.labels, result.object_count), "relabeled map dense");

    // ---- Test 5: mask rim acts as the border ----
    let mut inside = blank(40, 40).unwrap();
    paint_disk(&mut inside, 12.0, 20.0, 6.0, 1.0, 1.0);
    paint_disk(&mut inside, 28.0, 20.0, 6.0, 1.0, 1.0);
    let roi = Mask::from_fn(40, 40, |x, y| (6..34).contains(&x) && (6..34).contains(&y)).unwrap();
    let clipped = segment(&inside, Some(&roi), 0.5, &config).expect("segment failed");
    rp.compare_values(0.0, clipped.object_count as f64, 0.0);
    let roomy = Mask::from_fn(40, 40, |x, y| (2..38).contains(&x) && (2..38).contains(&y)).unwrap();
    let kept = segment(&inside, Some(&roomy), 0.5, &config).expect("segment failed");
    rp.compare_values(2.0, kept.object_count as f64, 0.0);

    // ---- Test 6: a validated segmenter matches the free function ----
    let segmenter = Segmenter::new(config.clone()).unwrap();
    let via_segmenter = segmenter.segment(&three, None, 0.5).unwrap();
    rp.compare_grids(&result.labels, &via_segmenter.labels);

    assert!(rp.cleanup(), "segment filters regression test failed");
}
