//! Seed fill operations
//!
//! Hole filling in label maps.

use crate::conncomp::{ConnectivityType, label_connected_components, neighbors};
use crate::error::RegionResult;
use unclump_core::LabelMap;

/// Fill holes in labeled objects
///
/// A hole is a 4-connected background region that does not touch the grid
/// edge and whose 8-neighbouring object pixels all carry one label. Each
/// hole is filled with that label. Background enclosed jointly by several
/// objects is left alone.
pub fn fill_labeled_holes(labels: &LabelMap) -> RegionResult<LabelMap> {
    let (w, h) = labels.dimensions();
    let background = labels.map(|v| v == 0);
    let (regions, count) = label_connected_components(&background, ConnectivityType::FourWay)?;

    let n = count as usize + 1;
    let mut touches_edge = vec![false; n];
    let mut owner = vec![0u32; n];
    let mut mixed = vec![false; n];

    for y in 0..h {
        for x in 0..w {
            let region = regions.get_unchecked(x, y) as usize;
            if region == 0 {
                continue;
            }
            if labels.is_edge(x, y) {
                touches_edge[region] = true;
            }
            for (nx, ny) in neighbors(w, h, x, y, ConnectivityType::EightWay) {
                let label = labels.get_unchecked(nx, ny);
                if label == 0 {
                    continue;
                }
                if owner[region] == 0 {
                    owner[region] = label;
                } else if owner[region] != label {
                    mixed[region] = true;
                }
            }
        }
    }

    let mut filled = labels.clone();
    let mut holes = 0usize;
    for (i, v) in filled.data_mut().iter_mut().enumerate() {
        let region = regions.data()[i] as usize;
        if region != 0 && !touches_edge[region] && !mixed[region] && owner[region] != 0 {
            *v = owner[region];
            holes += 1;
        }
    }

    log::trace!("fill_labeled_holes: filled {} pixels", holes);
    Ok(filled)
}
