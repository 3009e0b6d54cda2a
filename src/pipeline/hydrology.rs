//! Downslopes, watersheds and rivers

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{CornerId, MapGraph};

/// Upper bound on watershed propagation passes
const WATERSHED_PASSES: usize = 100;

/// Band of elevations a river may start from
const RIVER_SOURCE_MIN: f64 = 0.3;
const RIVER_SOURCE_MAX: f64 = 0.9;

/// Point each corner at the lowest of itself and its neighbors
///
/// Ties go to the lower corner index. The order is total and strict, so
/// following downslope links always ends at a corner pointing to itself.
pub fn calculate_downslopes(graph: &mut MapGraph) {
    let key = |c: CornerId| (graph.corners[c].elevation, c);
    let downslopes: Vec<CornerId> = graph
        .corners
        .iter()
        .map(|q| {
            q.adjacent.iter().copied().fold(q.id, |best, s| {
                let (be, bi) = key(best);
                let (se, si) = key(s);
                if se.total_cmp(&be).then(si.cmp(&bi)).is_lt() {
                    s
                } else {
                    best
                }
            })
        })
        .collect();

    for (corner, downslope) in graph.corners.iter_mut().zip(downslopes) {
        corner.downslope = downslope;
    }
}

/// Propagate each corner's watershed down its downslope chain
///
/// Corners start at their own downslope (coast and ocean corners at
/// themselves) and repeatedly adopt their downslope's watershed until no
/// watershed changes.
pub fn calculate_watersheds(graph: &mut MapGraph) {
    for corner in &mut graph.corners {
        corner.watershed = if corner.ocean || corner.coast {
            corner.id
        } else {
            corner.downslope
        };
    }

    let mut converged = false;
    for _ in 0..WATERSHED_PASSES {
        let mut changed = false;
        for q in 0..graph.corners.len() {
            let corner = &graph.corners[q];
            if corner.ocean || corner.coast || graph.corners[corner.watershed].coast {
                continue;
            }
            let r = graph.corners[corner.downslope].watershed;
            if !graph.corners[r].ocean && r != corner.watershed {
                graph.corners[q].watershed = r;
                changed = true;
            }
        }
        if !changed {
            converged = true;
            break;
        }
    }
    if !converged {
        log::warn!(
            "Watershed propagation stopped after {} passes without converging",
            WATERSHED_PASSES
        );
    }

    for corner in &mut graph.corners {
        corner.watershed_size = 0;
    }
    for q in 0..graph.corners.len() {
        let w = graph.corners[q].watershed;
        graph.corners[w].watershed_size += 1;
    }
}

/// Trace `trials` rivers from random corners down to the coast
///
/// A trial is skipped unless it starts on a non-ocean corner with elevation
/// in `[0.3, 0.9]`. Every step downhill bumps the flow counter of the edge
/// and of both corners.
pub fn create_rivers(graph: &mut MapGraph, rng: &mut ChaCha8Rng, trials: usize) {
    if graph.corners.is_empty() {
        return;
    }

    let mut rivers = 0;
    for _ in 0..trials {
        let mut q = rng.gen_range(0..graph.corners.len());
        let start = &graph.corners[q];
        if start.ocean || start.elevation < RIVER_SOURCE_MIN || start.elevation > RIVER_SOURCE_MAX {
            continue;
        }
        rivers += 1;

        while !graph.corners[q].coast {
            let down = graph.corners[q].downslope;
            if down == q {
                break;
            }
            if let Some(edge) = graph.edge_joining(q, down) {
                graph.edges[edge].river += 1;
            }
            graph.corners[q].river += 1;
            graph.corners[down].river += 1;
            q = down;
        }
    }

    log::debug!("{} of {} river trials produced a river", rivers, trials);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::elevation::{
        assign_corner_elevations, flatten_water_and_border, redistribute_elevations,
    };
    use crate::pipeline::fixtures::sample_graph;
    use crate::pipeline::water::assign_ocean_coast_and_land;
    use crate::terrain::RadialIsland;
    use rand::SeedableRng;

    fn prepared(seed: u64) -> MapGraph {
        let mut graph = sample_graph(seed, 400);
        assign_corner_elevations(&mut graph, &RadialIsland::new(seed as u32));
        assign_ocean_coast_and_land(&mut graph, 0.3);
        redistribute_elevations(&mut graph);
        flatten_water_and_border(&mut graph);
        calculate_downslopes(&mut graph);
        calculate_watersheds(&mut graph);
        graph
    }

    #[test]
    fn test_downslope_is_lowest_neighbor() {
        let graph = prepared(1);
        for corner in &graph.corners {
            let down = &graph.corners[corner.downslope];
            assert!(down.elevation <= corner.elevation);
            for &s in &corner.adjacent {
                assert!(down.elevation <= graph.corners[s].elevation);
            }
            assert!(down.id == corner.id || corner.adjacent.contains(&down.id));
        }
    }

    #[test]
    fn test_downslope_chains_terminate() {
        let graph = prepared(2);
        for start in 0..graph.corners.len() {
            let mut q = start;
            let mut steps = 0;
            while graph.corners[q].downslope != q {
                q = graph.corners[q].downslope;
                steps += 1;
                assert!(steps <= graph.corners.len(), "downslope cycle from {}", start);
            }
        }
    }

    #[test]
    fn test_watershed_sizes_cover_every_corner() {
        let graph = prepared(3);
        let total: usize = graph.corners.iter().map(|c| c.watershed_size).sum();
        assert_eq!(total, graph.corners.len());

        for corner in &graph.corners {
            if corner.ocean || corner.coast {
                assert_eq!(corner.watershed, corner.id);
            }
        }
    }

    #[test]
    fn test_rivers_flow_downhill() {
        let mut graph = prepared(4);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        create_rivers(&mut graph, &mut rng, 200);

        assert!(graph.edges.iter().any(|e| e.river > 0));
        for edge in graph.edges.iter().filter(|e| e.river > 0) {
            let [v0, v1] = edge.corners;
            let (a, b) = (&graph.corners[v0], &graph.corners[v1]);
            assert!(a.downslope == b.id || b.downslope == a.id);
            assert!(a.river > 0 && b.river > 0);
        }
    }

    #[test]
    fn test_rivers_are_reproducible() {
        let base = prepared(5);
        let trace = |seed| {
            let mut graph = base.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            create_rivers(&mut graph, &mut rng, 150);
            (
                graph.corners.iter().map(|c| c.river).collect::<Vec<_>>(),
                graph.edges.iter().map(|e| e.river).collect::<Vec<_>>(),
            )
        };

        assert_eq!(trace(42), trace(42));
    }

    #[test]
    fn test_rivers_on_empty_graph() {
        let mut graph = prepared(6);
        graph.corners.clear();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        create_rivers(&mut graph, &mut rng, 10);
    }
}
