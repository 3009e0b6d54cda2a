//! Island shape predicates
//!
//! Each shape answers "is this point land?" for points in normalized map
//! space, where the map spans `[-1, 1]²` with the origin at its centre.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::perlin::{sample_perlin_2d, PerlinConfig};

/// Gap between the inner and outer radial rings
const ISLAND_FACTOR: f64 = 1.07;

/// Land/water predicate over normalized map coordinates
pub trait IslandShape {
    fn is_land(&self, q: DVec2) -> bool;
}

/// Ring-shaped island with sinusoidal bumps and one bay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialIsland {
    pub bumps: u32,
    pub start_angle: f64,
    pub dip_angle: f64,
    pub dip_width: f64,
}

impl RadialIsland {
    /// Draw the bump count and angles from a seeded stream
    pub fn new(seed: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        Self {
            bumps: rng.gen_range(1..6),
            start_angle: rng.gen_range(0.0..TAU),
            dip_angle: rng.gen_range(0.0..TAU),
            dip_width: rng.gen_range(0.2..0.7),
        }
    }

    fn in_dip(&self, angle: f64) -> bool {
        [0.0, TAU, -TAU]
            .iter()
            .any(|shift| (angle - self.dip_angle + shift).abs() < self.dip_width)
    }
}

impl IslandShape for RadialIsland {
    fn is_land(&self, q: DVec2) -> bool {
        let angle = q.y.atan2(q.x);
        let length = 0.5 * (q.x.abs().max(q.y.abs()) + q.length());
        let bumps = f64::from(self.bumps);

        let mut r1 = 0.5 + 0.4 * (self.start_angle + bumps * angle + ((bumps + 3.0) * angle).cos()).sin();
        let mut r2 = 0.7 - 0.2 * (self.start_angle + bumps * angle - ((bumps + 2.0) * angle).sin()).sin();

        if self.in_dip(angle) {
            r1 = 0.2;
            r2 = 0.2;
        }

        length < r1 || (length > r1 * ISLAND_FACTOR && length < r2)
    }
}

/// A round body with a wavy rim and two eye holes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlobIsland;

impl IslandShape for BlobIsland {
    fn is_land(&self, q: DVec2) -> bool {
        let eye1 = DVec2::new(q.x - 0.2, q.y / 2.0 + 0.2).length() < 0.05;
        let eye2 = DVec2::new(q.x + 0.2, q.y / 2.0 + 0.2).length() < 0.05;
        let body = q.length() < 0.8 - 0.18 * (5.0 * q.y.atan2(q.x)).sin();
        body && !eye1 && !eye2
    }
}

/// Everything is land
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquareIsland;

impl IslandShape for SquareIsland {
    fn is_land(&self, _q: DVec2) -> bool {
        true
    }
}

/// Noise field thresholded more strictly toward the map edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerlinIsland {
    pub seed: u32,
    pub config: PerlinConfig,
}

impl PerlinIsland {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            config: PerlinConfig::default(),
        }
    }
}

impl IslandShape for PerlinIsland {
    fn is_land(&self, q: DVec2) -> bool {
        let noise = sample_perlin_2d(q, self.seed, &self.config);
        noise > 0.3 + 0.3 * q.length_squared()
    }
}
