//! Ocean, coast and lake classification

use std::collections::VecDeque;

use crate::graph::MapGraph;

/// Flood-fill ocean from the border and derive coast and water flags
///
/// Ocean seeds are regions touching a border corner that the island shape
/// left as water. A region is water when it is ocean or at least
/// `lake_threshold` of its corners are water; ocean then spreads through
/// connected water regions. Corner flags are derived from the regions they
/// touch.
pub fn assign_ocean_coast_and_land(graph: &mut MapGraph, lake_threshold: f64) {
    let mut queue = VecDeque::new();

    for region in &mut graph.regions {
        let mut num_water = 0;
        for &c in &region.corners {
            let corner = &graph.corners[c];
            if corner.border && corner.water && !region.ocean {
                region.ocean = true;
                queue.push_back(region.id);
            }
            if corner.water {
                num_water += 1;
            }
        }
        region.water =
            region.ocean || num_water as f64 >= region.corners.len() as f64 * lake_threshold;
    }

    while let Some(p) = queue.pop_front() {
        for i in 0..graph.regions[p].neighbors.len() {
            let r = graph.regions[p].neighbors[i];
            let neighbor = &mut graph.regions[r];
            if neighbor.water && !neighbor.ocean {
                neighbor.ocean = true;
                queue.push_back(r);
            }
        }
    }

    let coast: Vec<bool> = graph
        .regions
        .iter()
        .map(|region| {
            let num_ocean = region
                .neighbors
                .iter()
                .filter(|&&r| graph.regions[r].ocean)
                .count();
            let num_land = region
                .neighbors
                .iter()
                .filter(|&&r| !graph.regions[r].water)
                .count();
            num_ocean > 0 && num_land > 0
        })
        .collect();
    for (region, coast) in graph.regions.iter_mut().zip(coast) {
        region.coast = coast;
    }

    for corner in &mut graph.corners {
        let touches = corner.touches.len();
        let num_ocean = corner
            .touches
            .iter()
            .filter(|&&r| graph.regions[r].ocean)
            .count();
        let num_land = corner
            .touches
            .iter()
            .filter(|&&r| !graph.regions[r].water)
            .count();

        corner.ocean = touches > 0 && num_ocean == touches;
        corner.coast = num_ocean > 0 && num_land > 0;
        corner.water = corner.ocean || (num_land != touches && !corner.coast);
    }

    log::debug!(
        "{} ocean, {} coastal, {} lake regions",
        graph.regions.iter().filter(|r| r.ocean).count(),
        graph.regions.iter().filter(|r| r.coast).count(),
        graph.regions.iter().filter(|r| r.is_lake()).count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::elevation::assign_corner_elevations;
    use crate::pipeline::fixtures::sample_graph;
    use crate::terrain::{IslandShape, RadialIsland, SquareIsland};

    fn classified(shape: &dyn IslandShape) -> MapGraph {
        let mut graph = sample_graph(12, 400);
        assign_corner_elevations(&mut graph, shape);
        assign_ocean_coast_and_land(&mut graph, 0.3);
        graph
    }

    #[test]
    fn test_square_island_has_no_ocean() {
        let graph = classified(&SquareIsland);
        assert!(graph.regions.iter().all(|r| !r.ocean && !r.water && !r.coast));
        assert!(graph.corners.iter().all(|c| !c.ocean && !c.water && !c.coast));
    }

    #[test]
    fn test_radial_island_region_flags() {
        let graph = classified(&RadialIsland::new(4));

        assert!(graph.regions.iter().any(|r| r.ocean));
        assert!(graph.regions.iter().any(|r| !r.water));

        for region in &graph.regions {
            if region.ocean {
                assert!(region.water);
            }
            let has_ocean = region.neighbors.iter().any(|&r| graph.regions[r].ocean);
            let has_land = region.neighbors.iter().any(|&r| !graph.regions[r].water);
            assert_eq!(region.coast, has_ocean && has_land);
        }
    }

    #[test]
    fn test_ocean_is_connected_to_border() {
        let graph = classified(&RadialIsland::new(6));

        // Every ocean region reaches a border region through ocean regions
        let mut reached = vec![false; graph.regions.len()];
        let mut queue: VecDeque<usize> = graph
            .regions
            .iter()
            .filter(|r| r.ocean && r.border)
            .map(|r| r.id)
            .collect();
        for &r in &queue {
            reached[r] = true;
        }
        while let Some(p) = queue.pop_front() {
            for &r in &graph.regions[p].neighbors {
                if graph.regions[r].ocean && !reached[r] {
                    reached[r] = true;
                    queue.push_back(r);
                }
            }
        }
        for region in &graph.regions {
            assert_eq!(region.ocean, reached[region.id]);
        }
    }

    #[test]
    fn test_corner_flags_follow_regions() {
        let graph = classified(&RadialIsland::new(2));
        for corner in &graph.corners {
            let all_ocean = corner.touches.iter().all(|&r| graph.regions[r].ocean);
            assert_eq!(corner.ocean, all_ocean);
            if corner.coast {
                assert!(!corner.ocean && !corner.water);
            }
        }
    }
}
