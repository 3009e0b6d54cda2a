//! Corner and region elevation

use std::collections::VecDeque;

use super::{rank_fraction, rank_order};
use crate::graph::MapGraph;
use crate::terrain::IslandShape;

/// Flat cost of each relaxation hop
const STEP_COST: f64 = 0.01;
/// Extra cost for a hop between two land corners
const LAND_COST: f64 = 1.0;
/// Histogram shaping factor for redistribution
const SCALE_FACTOR: f64 = 1.1;

/// Mark corner water from the island shape, then relax elevation outward
/// from the border
///
/// Border corners start at 0 and every other corner at infinity. A hop
/// costs [`STEP_COST`], plus [`LAND_COST`] when both ends are land, so
/// water is flat and land rises with distance from the sea.
pub fn assign_corner_elevations(graph: &mut MapGraph, shape: &dyn IslandShape) {
    let bounds = graph.bounds;
    let mut queue = VecDeque::new();

    for corner in &mut graph.corners {
        corner.water = !shape.is_land(bounds.normalize(corner.position));
        if corner.border {
            corner.elevation = 0.0;
            queue.push_back(corner.id);
        } else {
            corner.elevation = f64::INFINITY;
        }
    }

    while let Some(q) = queue.pop_front() {
        let (q_elevation, q_water) = (graph.corners[q].elevation, graph.corners[q].water);
        for i in 0..graph.corners[q].adjacent.len() {
            let s = graph.corners[q].adjacent[i];
            let mut elevation = q_elevation + STEP_COST;
            if !q_water && !graph.corners[s].water {
                elevation += LAND_COST;
            }
            if elevation < graph.corners[s].elevation {
                graph.corners[s].elevation = elevation;
                queue.push_back(s);
            }
        }
    }

    let mut unreachable = 0;
    for corner in graph.corners.iter_mut().filter(|c| !c.elevation.is_finite()) {
        corner.elevation = 0.0;
        unreachable += 1;
    }
    if unreachable > 0 {
        log::warn!(
            "{} corners are not connected to the map border; their elevation is set to 0",
            unreachable
        );
    }
}

/// Histogram-equalize a set of elevations
///
/// The corner at rank fraction `y` gets `sqrt(1.1) - sqrt(1.1 * (1 - y))`,
/// clamped to 1, so low land is common and peaks are rare. Only the rank
/// order of the input matters.
pub fn redistribute_elevation_values(values: &[(usize, f64)]) -> Vec<(usize, f64)> {
    let order = rank_order(values);
    let count = order.len();
    order
        .into_iter()
        .enumerate()
        .map(|(rank, id)| {
            let y = rank_fraction(rank, count);
            let x = SCALE_FACTOR.sqrt() - (SCALE_FACTOR * (1.0 - y)).sqrt();
            (id, x.min(1.0))
        })
        .collect()
}

/// Redistribute land corner elevations
///
/// Ocean, coastal and border corners take no part.
pub fn redistribute_elevations(graph: &mut MapGraph) {
    let land: Vec<(usize, f64)> = graph
        .corners
        .iter()
        .filter(|c| !c.ocean && !c.coast && !c.border)
        .map(|c| (c.id, c.elevation))
        .collect();

    for (id, elevation) in redistribute_elevation_values(&land) {
        graph.corners[id].elevation = elevation;
    }
}

/// Pin ocean, coastal and border corners to sea level
pub fn flatten_water_and_border(graph: &mut MapGraph) {
    for corner in &mut graph.corners {
        if corner.ocean || corner.coast || corner.border {
            corner.elevation = 0.0;
        }
    }
}

/// Region elevation is the mean of its corners
pub fn assign_region_elevations(graph: &mut MapGraph) {
    for region in &mut graph.regions {
        region.elevation = if region.corners.is_empty() {
            0.0
        } else {
            let sum: f64 = region
                .corners
                .iter()
                .map(|&c| graph.corners[c].elevation)
                .sum();
            sum / region.corners.len() as f64
        };
    }
}
