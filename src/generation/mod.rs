//! Site generation
//!
//! Random points inside the map rectangle, evened out by Lloyd's relaxation
//! over planar Voronoi diagrams.

mod lloyd;
mod points;

pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::generate_random_points;

use glam::DVec2;
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::Result;
use crate::voronoi::Bounds;

/// Square map rectangle for a configuration, anchored at the origin
pub fn map_bounds(config: &MapConfig) -> Result<Bounds> {
    Bounds::square(config.extent())
}

/// Generate the map's sites from configuration
///
/// Draws the random points from `rng` and relaxes them. The stream is left
/// positioned after the point draws so later passes can keep using it.
pub fn generate_points(config: &MapConfig, bounds: &Bounds, rng: &mut ChaCha8Rng) -> Result<Vec<DVec2>> {
    // Step 1: Random points inside the margin
    let points = generate_random_points(config.point_count(), bounds, config.point_margin, rng)?;

    // Step 2: Lloyd's relaxation with convergence detection
    if config.lloyd_iterations > 0 {
        let options = LloydOptions {
            max_iterations: config.lloyd_iterations,
            convergence_threshold: config.lloyd_convergence,
        };
        lloyd_relaxation_with_options(points, bounds, options)
    } else {
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfigBuilder, MapSize};
    use rand::SeedableRng;

    #[test]
    fn test_generate_points_from_config() {
        let config = MapConfigBuilder::new()
            .variant_seed(1)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        let bounds = map_bounds(&config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let points = generate_points(&config, &bounds, &mut rng).unwrap();
        assert_eq!(points.len(), 200);
        assert!(points.iter().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn test_unrelaxed_points_keep_margin() {
        let config = MapConfigBuilder::new()
            .variant_seed(2)
            .map_size(MapSize::Custom {
                point_count: 40,
                extent: 100.0,
            })
            .lloyd_iterations(0)
            .unwrap()
            .point_margin(20.0)
            .unwrap()
            .build()
            .unwrap();
        let bounds = map_bounds(&config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let points = generate_points(&config, &bounds, &mut rng).unwrap();
        assert!(points
            .iter()
            .all(|p| (20.0..80.0).contains(&p.x) && (20.0..80.0).contains(&p.y)));
    }
}
