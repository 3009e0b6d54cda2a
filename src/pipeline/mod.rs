//! Procedural attribute pipeline
//!
//! Runs once over an extracted [`MapGraph`], strictly in this order:
//!
//! 1. Island membership and corner elevation from the border inward
//! 2. Ocean, coast and lake classification
//! 3. Elevation redistribution and region elevation
//! 4. Downslope and watershed
//! 5. River tracing
//! 6. Moisture propagation and redistribution
//! 7. Biome classification
//!
//! Only attribute fields change; the graph topology is left alone.

pub mod elevation;
pub mod hydrology;
pub mod moisture;
pub mod water;

use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::graph::MapGraph;
use crate::terrain::{Biome, IslandShape};

/// Apply every pass to `graph`
///
/// `rng` supplies the river trial corners; pass the same stream that placed
/// the points to keep a whole map reproducible from one seed.
pub fn run(graph: &mut MapGraph, shape: &dyn IslandShape, config: &MapConfig, rng: &mut ChaCha8Rng) {
    log::info!("Assigning corner elevations...");
    elevation::assign_corner_elevations(graph, shape);

    log::info!("Classifying ocean, coast and land...");
    water::assign_ocean_coast_and_land(graph, config.lake_threshold);

    log::info!("Redistributing elevations...");
    elevation::redistribute_elevations(graph);
    elevation::flatten_water_and_border(graph);
    elevation::assign_region_elevations(graph);

    log::info!("Computing downslopes and watersheds...");
    hydrology::calculate_downslopes(graph);
    hydrology::calculate_watersheds(graph);

    log::info!("Tracing rivers ({} trials)...", config.river_trials());
    hydrology::create_rivers(graph, rng, config.river_trials());

    log::info!("Assigning moisture...");
    moisture::assign_corner_moisture(graph);
    moisture::redistribute_moisture(graph);
    moisture::assign_region_moisture(graph);

    log::info!("Assigning biomes...");
    assign_biomes(graph);
}

/// Tag every region from its flags and averaged attributes
pub fn assign_biomes(graph: &mut MapGraph) {
    for region in &mut graph.regions {
        region.biome = Biome::classify(
            region.ocean,
            region.water,
            region.coast,
            region.elevation,
            region.moisture,
        );
    }
}

/// Indices of `values` sorted ascending by `(value, index)`
///
/// The index tie-break makes the order total, so ranking is reproducible
/// even when many corners share a value.
pub(crate) fn rank_order(values: &[(usize, f64)]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    sorted.into_iter().map(|(id, _)| id).collect()
}

/// Rank position mapped into `[0, 1]`
#[inline]
pub(crate) fn rank_fraction(rank: usize, count: usize) -> f64 {
    rank as f64 / count.saturating_sub(1).max(1) as f64
}

#[cfg(test)]
pub(crate) mod fixtures {
    use glam::DVec2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::graph::MapGraph;
    use crate::voronoi::{Bounds, Voronoi};

    /// Random-point graph on a 200x200 map
    pub fn sample_graph(seed: u64, count: usize) -> MapGraph {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<DVec2> = (0..count)
            .map(|_| DVec2::new(rng.gen_range(5.0..195.0), rng.gen_range(5.0..195.0)))
            .collect();
        let diagram = Voronoi::compute(&points, Bounds::square(200.0).unwrap()).unwrap();
        let mut graph = MapGraph::from_diagram(&diagram);
        graph.improve_corners();
        graph
    }
}
