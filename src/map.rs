//! VoronoiMap main structure

use std::collections::{BTreeMap, HashSet};

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::generation::{generate_points, map_bounds};
use crate::graph::{Corner, CornerId, GraphEdge, MapGraph, Region, RegionId};
use crate::pipeline;
use crate::terrain::Biome;
use crate::voronoi::{Bounds, Diagram, Voronoi};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Fewest distinct sites that still produce a vertex to build corners from
const MIN_MAP_SITES: usize = 3;

/// A complete polygon island map
///
/// Holds the diagram the map was built from and the attributed polygon
/// graph. Everything is derived from the configuration, so two maps built
/// from the same configuration are identical.
///
/// # Examples
///
/// ```
/// use voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .variant_seed(42)
///     .map_size(MapSize::Tiny)
///     .build()
///     .unwrap();
///
/// let map = VoronoiMap::generate(config).unwrap();
/// println!("Generated {} regions", map.region_count());
///
/// if let Some(region) = map.get_region(0) {
///     println!("Region 0 biome: {}", region.biome);
/// }
/// ```
#[derive(Clone)]
pub struct VoronoiMap {
    /// Configuration used to generate this map
    config: MapConfig,

    /// Sweep output the graph was extracted from
    diagram: Diagram,

    /// Regions, corners and edges with their attributes
    graph: MapGraph,

    /// Site lookup for position-to-region queries (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiMap {
    /// Generate a map from configuration
    ///
    /// Places and relaxes random points, sweeps the diagram, extracts the
    /// graph and runs the attribute pipeline. Point placement and river
    /// trials share one stream seeded by the variant seed.
    ///
    /// # Errors
    ///
    /// Propagates configuration and geometry errors; fails with
    /// `NotEnoughPoints` if fewer than three distinct sites remain.
    pub fn generate(config: MapConfig) -> Result<Self> {
        let bounds = map_bounds(&config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(config.variant_seed));

        log::info!(
            "Placing {} points ({} Lloyd iterations)...",
            config.point_count(),
            config.lloyd_iterations
        );
        let points = generate_points(&config, &bounds, &mut rng)?;

        Self::build(&points, bounds, config, rng)
    }

    /// Build a map over caller-supplied sites
    ///
    /// Only the map extent, island and river settings of `config` are used;
    /// point count, margin and Lloyd settings are ignored.
    pub fn from_points(points: &[DVec2], config: MapConfig) -> Result<Self> {
        let bounds = map_bounds(&config)?;
        let rng = ChaCha8Rng::seed_from_u64(u64::from(config.variant_seed));
        Self::build(points, bounds, config, rng)
    }

    fn build(points: &[DVec2], bounds: Bounds, config: MapConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        log::info!("Building Voronoi diagram...");
        let diagram = Voronoi::compute(points, bounds)?;
        if diagram.sites().len() < MIN_MAP_SITES {
            return Err(MapError::NotEnoughPoints {
                required: MIN_MAP_SITES,
                got: diagram.sites().len(),
            });
        }

        log::info!("Building graph...");
        let mut graph = MapGraph::from_diagram(&diagram);
        graph.improve_corners();

        let shape = config.island_shape.build(config.island_seed);
        pipeline::run(&mut graph, shape.as_ref(), &config, &mut rng);

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<DVec2> = graph.regions.iter().map(|r| r.position).collect();
            SpatialIndex::new(&sites)
        };

        log::info!(
            "Map ready: {} regions, {} corners, {} edges",
            graph.regions.len(),
            graph.corners.len(),
            graph.edges.len()
        );

        Ok(Self {
            config,
            diagram,
            graph,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Get the map rectangle
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.graph.bounds
    }

    /// Get the diagram the map was built from
    #[inline]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Get the attributed polygon graph
    #[inline]
    pub fn graph(&self) -> &MapGraph {
        &self.graph
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.graph.regions.len()
    }

    #[inline]
    pub fn corner_count(&self) -> usize {
        self.graph.corners.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edges.len()
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.graph.regions
    }

    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.graph.corners
    }

    #[inline]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.graph.edges
    }

    /// Get a region by ID
    ///
    /// Returns `None` if the ID is out of bounds.
    #[inline]
    pub fn get_region(&self, id: RegionId) -> Option<&Region> {
        self.graph.regions.get(id)
    }

    #[inline]
    pub fn get_corner(&self, id: CornerId) -> Option<&Corner> {
        self.graph.corners.get(id)
    }

    /// Neighbor IDs of a region (empty for an invalid ID)
    pub fn get_neighbors(&self, region_id: RegionId) -> &[RegionId] {
        self.graph
            .regions
            .get(region_id)
            .map(|r| r.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Find the region containing a position (requires spatial-index feature)
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_island::*;
    /// # use glam::DVec2;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let config = MapConfigBuilder::new().variant_seed(1).map_size(MapSize::Tiny).build().unwrap();
    /// # let map = VoronoiMap::generate(config).unwrap();
    /// let region_id = map.find_region_at(DVec2::new(300.0, 300.0));
    /// println!("The centre of the map is in region {}", region_id);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_region_at(&self, position: DVec2) -> RegionId {
        self.spatial_index.find_nearest(position)
    }

    /// Find regions within a given hop count from a center region (BFS)
    ///
    /// Includes the center region. Returns an empty vec for an invalid ID.
    pub fn find_regions_within_hops(&self, center_id: RegionId, hops: usize) -> Vec<RegionId> {
        if center_id >= self.graph.regions.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &region_id in &current {
                for &neighbor in self.get_neighbors(region_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut found: Vec<RegionId> = visited.into_iter().collect();
        found.sort_unstable();
        found
    }

    /// Number of regions per biome
    pub fn biome_counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for region in &self.graph.regions {
            *counts.entry(region.biome).or_insert(0) += 1;
        }
        counts
    }
}
