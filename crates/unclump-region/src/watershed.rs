//! Marker-controlled watershed
//!
//! The watershed floods a cost surface outward from labeled markers. Each
//! unlabeled pixel joins the region of the first front that reaches it;
//! fronts advance in order of increasing cost, and pixels of equal cost are
//! expanded first-in first-out. The ordering structure is a hierarchical
//! bucket queue with one FIFO per distinct cost level, which makes the
//! result independent of marker numbering and reproducible run to run.

use crate::conncomp::{ConnectivityType, neighbors};
use crate::error::{RegionError, RegionResult};
use std::collections::VecDeque;
use unclump_core::{LabelMap, Mask, Raster};

/// Options for watershed segmentation
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Connectivity used to grow fronts
    pub connectivity: ConnectivityType,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            connectivity: ConnectivityType::EightWay,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Hierarchical queue: one FIFO per cost level, popped lowest level first
///
/// A push below the current level moves the cursor back, so late arrivals
/// with a lower cost are still served before anything costlier.
#[derive(Debug)]
pub struct BucketQueue {
    buckets: Vec<VecDeque<usize>>,
    current: usize,
    len: usize,
}

impl BucketQueue {
    /// Create a queue with `levels` cost levels
    pub fn new(levels: usize) -> Self {
        Self {
            buckets: (0..levels).map(|_| VecDeque::new()).collect(),
            current: 0,
            len: 0,
        }
    }

    /// Append `item` to the FIFO of `level`
    pub fn push(&mut self, level: usize, item: usize) {
        self.buckets[level].push_back(item);
        self.current = self.current.min(level);
        self.len += 1;
    }

    /// Remove the oldest item of the lowest non-empty level
    pub fn pop(&mut self) -> Option<usize> {
        while self.current < self.buckets.len() {
            if let Some(item) = self.buckets[self.current].pop_front() {
                self.len -= 1;
                return Some(item);
            }
            self.current += 1;
        }
        None
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Rank of every pixel's cost among the distinct costs of the grid
///
/// Returns the per-pixel level and the number of levels.
fn cost_levels(cost: &Raster) -> RegionResult<(Vec<usize>, usize)> {
    if cost.data().iter().any(|v| !v.is_finite()) {
        return Err(RegionError::InvalidParameters(
            "watershed cost surface contains non-finite values".into(),
        ));
    }
    let mut distinct: Vec<f32> = cost.data().to_vec();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup();

    let levels = cost
        .data()
        .iter()
        .map(|v| distinct.partition_point(|d| d < v))
        .collect();
    Ok((levels, distinct.len()))
}

/// Flood `cost` from `markers`, restricted to `mask`
///
/// Marker pixels (non-zero labels) seed their regions; markers outside the
/// mask are ignored. Every masked pixel connected to a marker through
/// masked pixels receives that marker's label; masked pixels with no path
/// to any marker, and all unmasked pixels, stay 0.
///
/// # Errors
///
/// Returns an error if the grid sizes differ or the cost surface has
/// non-finite values.
///
/// # Examples
///
/// ```
/// use unclump_core::{LabelMap, Mask, Raster};
/// use unclump_region::{WatershedOptions, watershed};
///
/// // a valley in the middle column separates two markers
/// let cost = Raster::from_fn(5, 1, |x, _| if x == 2 { 1.0 } else { 0.0 }).unwrap();
/// let markers = LabelMap::from_data(5, 1, vec![1, 0, 0, 0, 2]).unwrap();
/// let mask = Mask::new_with_value(5, 1, true).unwrap();
/// let labels = watershed(&cost, &markers, &mask, &WatershedOptions::default()).unwrap();
/// assert_eq!(labels.data(), &[1, 1, 1, 2, 2]);
/// ```
pub fn watershed(
    cost: &Raster,
    markers: &LabelMap,
    mask: &Mask,
    options: &WatershedOptions,
) -> RegionResult<LabelMap> {
    cost.check_same_size(markers)?;
    cost.check_same_size(mask)?;

    let (w, h) = cost.dimensions();
    let (levels, level_count) = cost_levels(cost)?;
    let mut labels = LabelMap::new(w, h)?;
    let mut queue = BucketQueue::new(level_count);

    for (i, &m) in markers.data().iter().enumerate() {
        if m != 0 && mask.data()[i] {
            labels.data_mut()[i] = m;
            queue.push(levels[i], i);
        }
    }
    log::trace!(
        "watershed: {} marker pixels, {} cost levels",
        queue.len(),
        level_count
    );

    while let Some(i) = queue.pop() {
        let label = labels.data()[i];
        let (x, y) = labels.coords(i);
        for (nx, ny) in neighbors(w, h, x, y, options.connectivity) {
            let j = labels.index(nx, ny);
            if mask.data()[j] && labels.data()[j] == 0 {
                labels.data_mut()[j] = label;
                queue.push(levels[j], j);
            }
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_queue_order() {
        let mut q = BucketQueue::new(3);
        q.push(2, 10);
        q.push(1, 20);
        q.push(1, 21);
        assert_eq!(q.pop(), Some(20));
        q.push(0, 30);
        assert_eq!(q.pop(), Some(30));
        assert_eq!(q.pop(), Some(21));
        assert_eq!(q.pop(), Some(10));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_equal_cost_split_is_fair() {
        // flat surface: each pixel goes to the nearer marker
        let cost = Raster::new(9, 1).unwrap();
        let markers = LabelMap::from_data(9, 1, vec![1, 0, 0, 0, 0, 0, 0, 0, 2]).unwrap();
        let mask = Mask::new_with_value(9, 1, true).unwrap();
        let labels = watershed(&cost, &markers, &mask, &WatershedOptions::default()).unwrap();
        assert_eq!(labels.data(), &[1, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_mask_blocks_growth() {
        let cost = Raster::new(5, 1).unwrap();
        let markers = LabelMap::from_data(5, 1, vec![1, 0, 0, 0, 0]).unwrap();
        let mask = Mask::from_data(5, 1, vec![true, true, false, true, true]).unwrap();
        let labels = watershed(&cost, &markers, &mask, &WatershedOptions::default()).unwrap();
        assert_eq!(labels.data(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_rejects_nan_cost() {
        let cost = Raster::new_with_value(2, 2, f32::NAN).unwrap();
        let markers = LabelMap::new(2, 2).unwrap();
        let mask = Mask::new_with_value(2, 2, true).unwrap();
        assert!(watershed(&cost, &markers, &mask, &WatershedOptions::default()).is_err());
    }

    #[test]
    fn test_size_mismatch() {
        let cost = Raster::new(3, 3).unwrap();
        let markers = LabelMap::new(3, 2).unwrap();
        let mask = Mask::new(3, 3).unwrap();
        let err = watershed(&cost, &markers, &mask, &WatershedOptions::default()).unwrap_err();
        assert!(matches!(err, RegionError::Core(_)));
    }
}
