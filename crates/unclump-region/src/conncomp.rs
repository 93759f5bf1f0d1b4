//! Connected component analysis
//!
//! This module provides functions for finding and labeling connected
//! components in masks. It uses a Union-Find (disjoint set) structure for
//! efficient two-pass labeling.
//!
//! Labels are assigned in raster order of each component's first pixel,
//! so the same mask always yields the same label map.

use crate::error::RegionResult;
use unclump_core::{LabelMap, Mask};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

const FOUR_WAY: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const EIGHT_WAY: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl ConnectivityType {
    /// Neighbour offsets `(dx, dy)` in raster order
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY,
            ConnectivityType::EightWay => &EIGHT_WAY,
        }
    }

    /// Offsets of neighbours already visited in a forward raster scan
    fn backward_offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY[..2],
            ConnectivityType::EightWay => &EIGHT_WAY[..4],
        }
    }
}

/// Iterate over the in-grid neighbours of (x, y)
pub(crate) fn neighbors(
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    connectivity: ConnectivityType,
) -> impl Iterator<Item = (u32, u32)> {
    connectivity.offsets().iter().filter_map(move |&(dx, dy)| {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        (nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64)
            .then_some((nx as u32, ny as u32))
    })
}

/// Axis-aligned bounding box, inclusive of its first pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A connected component in a label map
#[derive(Debug, Clone)]
pub struct ConnectedComponent {
    /// Label of this component
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: BoundingBox,
    /// Mean (x, y) position of the component's pixels
    pub centroid: (f32, f32),
}

/// Disjoint-set forest over provisional labels
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // index 0 is background and never merged
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // keep the smaller root so the first-seen label wins
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label all connected components of a mask
///
/// Returns the label map (`0` for unset pixels, `1..=n` for components)
/// and the number of components `n`.
///
/// # Examples
///
/// ```
/// use unclump_core::Mask;
/// use unclump_region::{ConnectivityType, label_connected_components};
///
/// let mask = Mask::from_fn(5, 5, |x, y| x == y).unwrap();
/// let (_, four) = label_connected_components(&mask, ConnectivityType::FourWay).unwrap();
/// let (_, eight) = label_connected_components(&mask, ConnectivityType::EightWay).unwrap();
/// assert_eq!(four, 5);
/// assert_eq!(eight, 1);
/// ```
pub fn label_connected_components(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<(LabelMap, u32)> {
    let (w, h) = mask.dimensions();
    let mut provisional = LabelMap::new(w, h)?;
    let mut sets = UnionFind::new();

    // First pass: provisional labels and equivalences
    for y in 0..h {
        for x in 0..w {
            if !mask.get_unchecked(x, y) {
                continue;
            }
            let mut current = 0u32;
            for &(dx, dy) in connectivity.backward_offsets() {
                let Some(n) = provisional.get_signed(x as i64 + dx as i64, y as i64 + dy as i64)
                else {
                    continue;
                };
                if n == 0 {
                    continue;
                }
                if current == 0 {
                    current = n;
                } else {
                    sets.union(current, n);
                }
            }
            if current == 0 {
                current = sets.make_set();
            }
            provisional.set_unchecked(x, y, current);
        }
    }

    // Second pass: resolve to dense labels in first-seen order
    let mut dense = vec![0u32; sets.parent.len()];
    let mut count = 0u32;
    let mut labels = provisional;
    for v in labels.data_mut().iter_mut() {
        if *v == 0 {
            continue;
        }
        let root = sets.find(*v) as usize;
        if dense[root] == 0 {
            count += 1;
            dense[root] = count;
        }
        *v = dense[root];
    }

    Ok((labels, count))
}

/// Find all connected components of a mask
///
/// Returns one entry per component, ordered by label.
pub fn find_connected_components(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    let (labels, _) = label_connected_components(mask, connectivity)?;
    Ok(component_stats(&labels))
}

/// Per-label statistics of a label map
///
/// Returns one entry per label present, ordered by label.
pub fn component_stats(labels: &LabelMap) -> Vec<ConnectedComponent> {
    struct Acc {
        count: u32,
        sx: f64,
        sy: f64,
        min_x: u32,
        min_y: u32,
        max_x: u32,
        max_y: u32,
    }

    let max_label = labels.max_label() as usize;
    let mut accs: Vec<Option<Acc>> = (0..=max_label).map(|_| None).collect();

    for y in 0..labels.height() {
        for x in 0..labels.width() {
            let label = labels.get_unchecked(x, y) as usize;
            if label == 0 {
                continue;
            }
            let acc = accs[label].get_or_insert(Acc {
                count: 0,
                sx: 0.0,
                sy: 0.0,
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            });
            acc.count += 1;
            acc.sx += x as f64;
            acc.sy += y as f64;
            acc.min_x = acc.min_x.min(x);
            acc.min_y = acc.min_y.min(y);
            acc.max_x = acc.max_x.max(x);
            acc.max_y = acc.max_y.max(y);
        }
    }

    accs.into_iter()
        .enumerate()
        .filter_map(|(label, acc)| {
            acc.map(|a| ConnectedComponent {
                label: label as u32,
                pixel_count: a.count,
                bounds: BoundingBox {
                    x: a.min_x,
                    y: a.min_y,
                    w: a.max_x - a.min_x + 1,
                    h: a.max_y - a.min_y + 1,
                },
                centroid: (
                    (a.sx / a.count as f64) as f32,
                    (a.sy / a.count as f64) as f32,
                ),
            })
        })
        .collect()
}
