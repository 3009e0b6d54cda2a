//! Island Map Configuration and Builder
//!
//! This module provides configuration types for deterministic island map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::terrain::IslandShapeKind;

/// Map size presets
///
/// Each preset maps to a point count on a square map of fixed extent, so
/// larger presets produce smaller, more numerous polygons.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSize {
    /// 200 polygons
    Tiny,
    /// 500 polygons
    Small,
    /// 1,000 polygons (default)
    Medium,
    /// 2,000 polygons
    Large,
    /// Custom point count and map extent
    Custom {
        /// Number of Voronoi sites to place
        point_count: usize,
        /// Side length of the square map in world units
        extent: f64,
    },
}

impl MapSize {
    /// Side length of the preset maps
    pub const DEFAULT_EXTENT: f64 = 600.0;

    /// Number of sites (and therefore regions) for this size
    pub fn point_count(self) -> usize {
        match self {
            MapSize::Tiny => 200,
            MapSize::Small => 500,
            MapSize::Medium => 1_000,
            MapSize::Large => 2_000,
            MapSize::Custom { point_count, .. } => point_count,
        }
    }

    /// Side length of the square map
    pub fn extent(self) -> f64 {
        match self {
            MapSize::Custom { extent, .. } => extent,
            _ => Self::DEFAULT_EXTENT,
        }
    }

    /// Get a human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Tiny => "Tiny",
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize::Medium
    }
}

/// Configuration for deterministic island map generation
///
/// The same configuration always produces the identical map, down to the
/// bit patterns of every elevation and moisture value.
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .variant_seed(42)
///     .island_shape_name("radial")
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.island_shape, IslandShapeKind::Radial);
/// assert_eq!(config.island_seed, 42);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Map size preset (point count and extent)
    pub map_size: MapSize,

    /// Which island outline predicate decides land vs. water
    pub island_shape: IslandShapeKind,

    /// Seed for the island outline's own randomness
    pub island_seed: u32,

    /// Seed for point placement jitter and river trials
    ///
    /// Changing only this seed keeps the island outline but moves the
    /// polygons and rivers around inside it.
    pub variant_seed: u32,

    /// Number of Lloyd relaxation passes applied to the random points
    ///
    /// - 0: Raw random points (irregular polygons)
    /// - 2: Default, evens out polygon sizes without looking like a grid
    pub lloyd_iterations: usize,

    /// Early-exit threshold for Lloyd relaxation (fraction of map extent)
    ///
    /// - 0.0: Default, always run every iteration
    /// - 0.001: Stop once no point moves more than 0.1% of the extent
    pub lloyd_convergence: f64,

    /// Fraction of water corners that turns a non-ocean region into a lake
    pub lake_threshold: f64,

    /// Number of randomized river trials (`None` = half the map extent)
    pub river_attempts: Option<usize>,

    /// Distance kept between random points and the map border
    pub point_margin: f64,
}

impl MapConfig {
    /// Get the site count for this configuration
    #[inline]
    pub fn point_count(&self) -> usize {
        self.map_size.point_count()
    }

    /// Get the map side length for this configuration
    #[inline]
    pub fn extent(&self) -> f64 {
        self.map_size.extent()
    }

    /// Number of river trials that will be attempted
    #[inline]
    pub fn river_trials(&self) -> usize {
        self.river_attempts
            .unwrap_or_else(|| (self.extent() / 2.0) as usize)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let seed = rand::random();
        Self {
            map_size: MapSize::default(),
            island_shape: IslandShapeKind::default(),
            island_seed: seed,
            variant_seed: seed,
            lloyd_iterations: 2,
            lloyd_convergence: 0.0,
            lake_threshold: 0.3,
            river_attempts: None,
            point_margin: 10.0,
        }
    }
}

/// Builder for creating MapConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .variant_seed(7)
///     .island_seed(99)
///     .map_size(MapSize::Tiny)
///     .lloyd_iterations(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.point_count(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    map_size: MapSize,
    island_shape: IslandShapeKind,
    island_seed: Option<u32>,
    variant_seed: Option<u32>,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
    lake_threshold: f64,
    river_attempts: Option<usize>,
    point_margin: f64,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - map_size: Medium (1,000 polygons on a 600x600 map)
    /// - island_shape: Radial
    /// - variant_seed: Random
    /// - island_seed: Same as variant_seed
    /// - lloyd_iterations: 2
    /// - lloyd_convergence: 0.0 (disabled)
    /// - lake_threshold: 0.3
    /// - river_attempts: half the map extent
    /// - point_margin: 10.0
    pub fn new() -> Self {
        Self {
            map_size: MapSize::default(),
            island_shape: IslandShapeKind::default(),
            island_seed: None,
            variant_seed: None,
            lloyd_iterations: 2,
            lloyd_convergence: 0.0,
            lake_threshold: 0.3,
            river_attempts: None,
            point_margin: 10.0,
        }
    }

    /// Set the map size preset
    pub fn map_size(mut self, size: MapSize) -> Self {
        self.map_size = size;
        self
    }

    /// Set the island outline
    pub fn island_shape(mut self, shape: IslandShapeKind) -> Self {
        self.island_shape = shape;
        self
    }

    /// Set the island outline by name (`radial`, `blob`, `square`, `perlin`)
    ///
    /// # Errors
    ///
    /// Returns `UnknownIslandShape` for any other name
    pub fn island_shape_name(mut self, name: &str) -> Result<Self> {
        self.island_shape = name.parse()?;
        Ok(self)
    }

    /// Set the seed used by the island outline
    pub fn island_seed(mut self, seed: u32) -> Self {
        self.island_seed = Some(seed);
        self
    }

    /// Set the seed used for point placement and rivers
    pub fn variant_seed(mut self, seed: u32) -> Self {
        self.variant_seed = Some(seed);
        self
    }

    /// Set the number of Lloyd relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(MapError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or not finite
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !(threshold >= 0.0) || !threshold.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Set the water-corner fraction that makes a region a lake
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is outside [0, 1]
    pub fn lake_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MapError::InvalidConfig(format!(
                "lake threshold must be within [0, 1] (got {})",
                threshold
            )));
        }
        self.lake_threshold = threshold;
        Ok(self)
    }

    /// Set the number of river trials
    pub fn river_attempts(mut self, attempts: usize) -> Self {
        self.river_attempts = Some(attempts);
        self
    }

    /// Set the border margin for random points
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if margin is negative
    pub fn point_margin(mut self, margin: f64) -> Result<Self> {
        if !(margin >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "point margin must be >= 0 (got {})",
                margin
            )));
        }
        self.point_margin = margin;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no variant seed was provided, generates a random one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the margin leaves no room for points or a
    /// custom size has a non-positive extent.
    pub fn build(self) -> Result<MapConfig> {
        let extent = self.map_size.extent();
        if !(extent > 0.0) || !extent.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "map extent must be positive (got {})",
                extent
            )));
        }
        if self.point_margin * 2.0 >= extent {
            return Err(MapError::InvalidConfig(format!(
                "point margin {} leaves no room on a map of extent {}",
                self.point_margin, extent
            )));
        }

        let variant_seed = self.variant_seed.unwrap_or_else(rand::random);
        let island_seed = self.island_seed.unwrap_or(variant_seed);

        Ok(MapConfig {
            map_size: self.map_size,
            island_shape: self.island_shape,
            island_seed,
            variant_seed,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            lake_threshold: self.lake_threshold,
            river_attempts: self.river_attempts,
            point_margin: self.point_margin,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
