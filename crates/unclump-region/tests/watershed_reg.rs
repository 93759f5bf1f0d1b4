//! Watershed segmentation regression test
//!
//! Splits two overlapping disks with a distance-based cost surface and
//! checks the partition properties: every masked pixel reachable from a
//! marker gets exactly one label, unmasked pixels stay 0, and the split is
//! independent of marker numbering.
//!
//! Run with:
//! ```
//! cargo test -p unclump-region --test watershed_reg
//! ```

use unclump_core::{LabelMap, Mask, Raster};
use unclump_region::{
    BoundaryCondition, WatershedOptions, component_areas, distance_transform, watershed,
};
use unclump_test::RegParams;

fn overlapping_disks() -> Mask {
    Mask::from_fn(50, 30, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let a = (x - 16).pow(2) + (y - 15).pow(2) <= 100;
        let b = (x - 33).pow(2) + (y - 15).pow(2) <= 100;
        a || b
    })
    .unwrap()
}

fn distance_cost(mask: &Mask) -> Raster {
    let dist = distance_transform(mask, BoundaryCondition::Foreground).unwrap();
    let (_, hi) = dist.min_max(None).unwrap();
    dist.map(|d| hi - d)
}

#[test]
fn watershed_reg() {
    let mut rp = RegParams::new("watershed");

    let mask = overlapping_disks();
    let cost = distance_cost(&mask);
    let options = WatershedOptions::default();

    // ---- Test 1: two markers split the clump ----
    let mut markers = LabelMap::new(50, 30).unwrap();
    markers.set(16, 15, 1).unwrap();
    markers.set(33, 15, 2).unwrap();
    let labels = watershed(&cost, &markers, &mask, &options).expect("watershed failed");

    let areas = component_areas(&labels);
    eprintln!("  areas: {:?}", &areas[1..]);
    rp.compare_values(2.0, (areas.len() - 1) as f64, 0.0);
    rp.compare_values(areas[1] as f64, areas[2] as f64, 20.0);

    // ---- Test 2: partition of the mask ----
    let labeled = labels.to_mask();
    rp.compare_grids(&mask, &labeled);

    // left disk centre and right disk centre keep their markers
    rp.compare_values(1.0, labels.get(10, 15).unwrap() as f64, 0.0);
    rp.compare_values(2.0, labels.get(40, 15).unwrap() as f64, 0.0);

    // ---- Test 3: swapping marker ids swaps the labels only ----
    let mut swapped = LabelMap::new(50, 30).unwrap();
    swapped.set(16, 15, 2).unwrap();
    swapped.set(33, 15, 1).unwrap();
    let relabeled = watershed(&cost, &swapped, &mask, &options).unwrap();
    let mapped = relabeled.map(|v| match v {
        1 => 2,
        2 => 1,
        other => other,
    });
    rp.compare_grids(&labels, &mapped);

    // ---- Test 4: determinism ----
    let again = watershed(&cost, &markers, &mask, &options).unwrap();
    rp.compare_grids(&labels, &again);
    rp.write_labels_and_check(&labels).expect("write labels failed");

    // ---- Test 5: component without a marker stays unlabeled ----
    let mut two_parts = mask.clone();
    for y in 0..30 {
        for x in 45..50 {
            two_parts.set(x, y, x == 47).unwrap();
        }
    }
    let mut one_marker = LabelMap::new(50, 30).unwrap();
    one_marker.set(16, 15, 1).unwrap();
    let grown = watershed(&cost, &one_marker, &two_parts, &options).unwrap();
    rp.compare_values(0.0, grown.get(47, 0).unwrap() as f64, 0.0);
    rp.compare_values(1.0, grown.get(40, 15).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "watershed regression test failed");
}
