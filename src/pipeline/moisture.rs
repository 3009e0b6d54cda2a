//! Moisture propagation

use std::collections::VecDeque;

use super::{rank_fraction, rank_order};
use crate::graph::MapGraph;

/// Moisture kept per hop away from a source
const DECAY: f64 = 0.9;
/// Cap on the moisture a river seeds
const RIVER_MOISTURE_CAP: f64 = 3.0;

/// Spread moisture from fresh water and rivers across the land
///
/// Lakes seed 1.0 and river corners `0.2 * flow` (up to 3.0); each hop
/// keeps [`DECAY`] of it. Ocean and coastal corners end at 1.0.
pub fn assign_corner_moisture(graph: &mut MapGraph) {
    let mut queue = VecDeque::new();

    for corner in &mut graph.corners {
        if (corner.water || corner.river > 0) && !corner.ocean {
            corner.moisture = if corner.river > 0 {
                (0.2 * f64::from(corner.river)).min(RIVER_MOISTURE_CAP)
            } else {
                1.0
            };
            queue.push_back(corner.id);
        } else {
            corner.moisture = 0.0;
        }
    }

    while let Some(q) = queue.pop_front() {
        let moisture = graph.corners[q].moisture * DECAY;
        for i in 0..graph.corners[q].adjacent.len() {
            let r = graph.corners[q].adjacent[i];
            if moisture > graph.corners[r].moisture {
                graph.corners[r].moisture = moisture;
                queue.push_back(r);
            }
        }
    }

    for corner in &mut graph.corners {
        if corner.ocean || corner.coast {
            corner.moisture = 1.0;
        }
    }
}

/// Spread land corner moisture evenly over `[0, 1]` by rank
pub fn redistribute_moisture(graph: &mut MapGraph) {
    let land: Vec<(usize, f64)> = graph
        .corners
        .iter()
        .filter(|c| !c.ocean && !c.coast)
        .map(|c| (c.id, c.moisture))
        .collect();

    let order = rank_order(&land);
    let count = order.len();
    for (rank, id) in order.into_iter().enumerate() {
        graph.corners[id].moisture = rank_fraction(rank, count);
    }
}

/// Clamp corner moisture and average it per region
pub fn assign_region_moisture(graph: &mut MapGraph) {
    for corner in &mut graph.corners {
        corner.moisture = corner.moisture.clamp(0.0, 1.0);
    }

    for region in &mut graph.regions {
        region.moisture = if region.corners.is_empty() {
            0.0
        } else {
            let sum: f64 = region.corners.iter().map(|&c| graph.corners[c].moisture).sum();
            sum / region.corners.len() as f64
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::sample_graph;
    use crate::pipeline::water::assign_ocean_coast_and_land;
    use crate::pipeline::{elevation, hydrology};
    use crate::terrain::BlobIsland;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn watered(seed: u64) -> MapGraph {
        let mut graph = sample_graph(seed, 400);
        elevation::assign_corner_elevations(&mut graph, &BlobIsland);
        assign_ocean_coast_and_land(&mut graph, 0.3);
        elevation::redistribute_elevations(&mut graph);
        elevation::flatten_water_and_border(&mut graph);
        hydrology::calculate_downslopes(&mut graph);
        hydrology::calculate_watersheds(&mut graph);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        hydrology::create_rivers(&mut graph, &mut rng, 100);
        graph
    }

    #[test]
    fn test_sources_and_decay() {
        let mut graph = watered(1);
        assign_corner_moisture(&mut graph);

        for corner in &graph.corners {
            assert!(corner.moisture >= 0.0);
            if corner.ocean || corner.coast {
                assert_eq!(corner.moisture, 1.0);
                continue;
            }
            let seed = if corner.river > 0 {
                (0.2 * f64::from(corner.river)).min(RIVER_MOISTURE_CAP)
            } else if corner.water {
                1.0
            } else {
                0.0
            };
            assert!(corner.moisture >= seed);
            // Neighbors of a source keep at least one hop of its moisture
            for &a in &corner.adjacent {
                let neighbor = &graph.corners[a];
                if !neighbor.ocean && !neighbor.coast {
                    assert!(neighbor.moisture >= seed * DECAY - 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_redistribution_spans_unit_interval() {
        let mut graph = watered(2);
        assign_corner_moisture(&mut graph);
        redistribute_moisture(&mut graph);

        let land: Vec<f64> = graph
            .corners
            .iter()
            .filter(|c| !c.ocean && !c.coast)
            .map(|c| c.moisture)
            .collect();
        assert!(land.len() > 1);
        assert!(land.iter().any(|&m| m == 0.0));
        assert!(land.iter().any(|&m| m == 1.0));
        assert!(land.iter().all(|m| (0.0..=1.0).contains(m)));
    }

    #[test]
    fn test_redistribution_is_idempotent() {
        let mut graph = watered(3);
        assign_corner_moisture(&mut graph);
        redistribute_moisture(&mut graph);
        let once: Vec<f64> = graph.corners.iter().map(|c| c.moisture).collect();
        redistribute_moisture(&mut graph);
        let twice: Vec<f64> = graph.corners.iter().map(|c| c.moisture).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_region_moisture_in_range() {
        let mut graph = watered(4);
        assign_corner_moisture(&mut graph);
        redistribute_moisture(&mut graph);
        assign_region_moisture(&mut graph);

        for region in &graph.regions {
            assert!((0.0..=1.0).contains(&region.moisture));
        }
    }
}
