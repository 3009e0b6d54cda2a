//! Voronoi-based polygon island map generation
//!
//! A standalone library with two halves: a step-able Fortune sweep that
//! builds clipped planar Voronoi diagrams, and a pipeline that turns a
//! diagram into an island map with elevation, rivers, moisture and biomes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_island::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .variant_seed(42)
//!     .island_shape(IslandShapeKind::Perlin)
//!     .map_size(MapSize::Medium)
//!     .lloyd_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let map = VoronoiMap::generate(config).unwrap();
//!
//! for (biome, count) in map.biome_counts() {
//!     println!("{biome}: {count}");
//! }
//! ```
//!
//! The sweep can also be driven one event at a time:
//!
//! ```rust
//! use voronoi_island::*;
//!
//! let points = [DVec2::new(10.0, 10.0), DVec2::new(90.0, 20.0), DVec2::new(40.0, 80.0)];
//! let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap();
//! let mut sweep = Voronoi::new(&points, bounds).unwrap();
//!
//! while !sweep.is_done() {
//!     let event = sweep.step();
//!     println!("step {}: {:?}", sweep.step_number(), event);
//! }
//! assert_eq!(sweep.diagram().vertices().len(), 1);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-region lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and the map graph

// Modules
pub mod error;
pub mod config;
pub mod voronoi;
pub mod graph;
pub mod generation;
pub mod terrain;
pub mod pipeline;
pub mod map;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MapError, Result};
pub use config::{MapConfig, MapConfigBuilder, MapSize};
pub use voronoi::{Bounds, DelaunayLine, Diagram, SpanningTreeKind, SweepEvent, SweepState, Voronoi};
pub use graph::{Corner, GraphEdge, MapGraph, Region};
pub use map::VoronoiMap;
pub use terrain::{Biome, IslandShape, IslandShapeKind, PerlinConfig};
pub use generation::LloydOptions;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
