//! Watershed partitioning of clumps
//!
//! Seeds are grouped into 8-connected clusters, each cluster becomes one
//! marker, and the markers flood a cost surface inside the foreground.

use crate::config::WatershedStrategy;
use crate::error::{SegmentError, SegmentResult};
use unclump_core::{LabelMap, Mask, Raster};
use unclump_region::{
    BoundaryCondition, ConnectivityType, WatershedOptions, distance_transform,
    label_connected_components, watershed,
};

/// Cost surface for the watershed
///
/// [`WatershedStrategy::Intensity`] inverts the raster so basins sit on
/// bright peaks; [`WatershedStrategy::Distance`] inverts the distance
/// transform of the foreground so basins sit at object centres. A
/// precomputed distance transform is reused when given.
///
/// # Errors
///
/// Returns `SegmentError::UnsupportedStrategyCombination` for
/// [`WatershedStrategy::None`].
pub fn cost_surface(
    strategy: WatershedStrategy,
    raster: &Raster,
    foreground: &LabelMap,
    distance: Option<&Raster>,
) -> SegmentResult<Raster> {
    let source = match strategy {
        WatershedStrategy::Intensity => raster.clone(),
        WatershedStrategy::Distance => match distance {
            Some(d) => {
                d.check_same_size(foreground)?;
                d.clone()
            }
            None => distance_transform(&foreground.to_mask(), BoundaryCondition::Foreground)?,
        },
        WatershedStrategy::None => {
            return Err(SegmentError::UnsupportedStrategyCombination(
                "watershed requested with strategy 'none'".into(),
            ));
        }
    };
    let peak = source.min_max(None).map_or(0.0, |(_, hi)| hi);
    Ok(source.map(|v| peak - v))
}

/// Split `region_mask` among the seeds by flooding `cost`
///
/// Returns the label map and the number of seed clusters. Every pixel of
/// `region_mask` connected to a seed receives exactly one label; pixels
/// outside it stay 0. Labels follow the raster order of the seed clusters,
/// and the result does not depend on how the clusters are numbered.
///
/// # Errors
///
/// Returns `SegmentError::DimensionMismatch` if the inputs differ in size.
pub fn partition(
    cost: &Raster,
    seeds: &Mask,
    region_mask: &Mask,
) -> SegmentResult<(LabelMap, u32)> {
    for other in [seeds, region_mask] {
        if !cost.same_size(other) {
            return Err(SegmentError::DimensionMismatch {
                expected: cost.dimensions(),
                actual: other.dimensions(),
            });
        }
    }
    let (markers, count) = label_connected_components(seeds, ConnectivityType::EightWay)?;
    let labels = watershed(cost, &markers, region_mask, &WatershedOptions::default())?;
    log::trace!("partition: {} seed clusters", count);
    Ok((labels, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_cost_inverts() {
        let raster = Raster::from_data(3, 1, vec![0.2, 1.0, 0.5]).unwrap();
        let fg = LabelMap::new_with_value(3, 1, 1).unwrap();
        let cost = cost_surface(WatershedStrategy::Intensity, &raster, &fg, None).unwrap();
        for (got, want) in cost.data().iter().zip([0.8, 0.0, 0.5]) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distance_cost_reuses_transform() {
        let raster = Raster::new(3, 1).unwrap();
        let fg = LabelMap::new_with_value(3, 1, 1).unwrap();
        let dist = Raster::from_data(3, 1, vec![1.0, 3.0, 2.0]).unwrap();
        let cost = cost_surface(WatershedStrategy::Distance, &raster, &fg, Some(&dist)).unwrap();
        assert_eq!(cost.data(), &[2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_none_strategy_rejected() {
        let raster = Raster::new(2, 2).unwrap();
        let fg = LabelMap::new(2, 2).unwrap();
        assert!(matches!(
            cost_surface(WatershedStrategy::None, &raster, &fg, None),
            Err(SegmentError::UnsupportedStrategyCombination(_))
        ));
    }

    #[test]
    fn test_partition_two_seeds() {
        let cost = Raster::from_fn(7, 1, |x, _| if x == 3 { 5.0 } else { 0.0 }).unwrap();
        let seeds = Mask::from_fn(7, 1, |x, _| x == 0 || x == 6).unwrap();
        let region = Mask::new_with_value(7, 1, true).unwrap();
        let (labels, count) = partition(&cost, &seeds, &region).unwrap();
        assert_eq!(count, 2);
        assert_eq!(labels.data()[..3], [1, 1, 1]);
        assert_eq!(labels.data()[4..], [2, 2, 2]);
        assert_ne!(labels.get(3, 0), Some(0));
    }

    #[test]
    fn test_touching_seeds_are_one_marker() {
        let cost = Raster::new(5, 5).unwrap();
        let seeds = Mask::from_fn(5, 5, |x, y| (x, y) == (1, 1) || (x, y) == (2, 2)).unwrap();
        let region = Mask::new_with_value(5, 5, true).unwrap();
        let (labels, count) = partition(&cost, &seeds, &region).unwrap();
        assert_eq!(count, 1);
        assert!(labels.data().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_partition_size_mismatch() {
        let cost = Raster::new(4, 4).unwrap();
        let seeds = Mask::new(4, 3).unwrap();
        let region = Mask::new(4, 4).unwrap();
        assert!(matches!(
            partition(&cost, &seeds, &region),
            Err(SegmentError::DimensionMismatch { .. })
        ));
    }
}
