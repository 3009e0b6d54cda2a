//! Polygon graph extracted from a finished diagram
//!
//! Regions (one per site), corners (deduplicated Voronoi vertices and
//! clipped edge endpoints) and graph edges (one per visible diagram edge).
//! Relations between them are stored as indices into the three arenas.

use std::collections::HashMap;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::terrain::Biome;
use crate::voronoi::diagram::order_polygon_vertices;
use crate::voronoi::{Bounds, Diagram};

pub type RegionId = usize;
pub type CornerId = usize;
pub type GraphEdgeId = usize;

/// Two corner positions closer than this (squared) are the same corner
const CORNER_MERGE_EPSILON: f64 = 1e-6;

/// A polygon around one site
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    /// Site position
    pub position: DVec2,

    /// Regions sharing a visible edge with this one
    pub neighbors: Vec<RegionId>,
    /// Edges bounding the polygon, ordered by angle around `position`
    pub borders: Vec<GraphEdgeId>,
    /// Polygon corners, ordered by angle around `position`
    pub corners: Vec<CornerId>,

    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    /// Touches the map rectangle
    pub border: bool,
    /// Mean of the corner elevations, in `[0, 1]`
    pub elevation: f64,
    /// Mean of the corner moistures, in `[0, 1]`
    pub moisture: f64,
    pub biome: Biome,
}

impl Region {
    fn new(id: RegionId, position: DVec2) -> Self {
        Self {
            id,
            position,
            neighbors: Vec::new(),
            borders: Vec::new(),
            corners: Vec::new(),
            water: false,
            ocean: false,
            coast: false,
            border: false,
            elevation: 0.0,
            moisture: 0.0,
            biome: Biome::default(),
        }
    }

    /// Water but not ocean
    #[inline]
    pub fn is_lake(&self) -> bool {
        self.water && !self.ocean
    }

    #[inline]
    pub fn is_neighbor_of(&self, other: RegionId) -> bool {
        self.neighbors.contains(&other)
    }
}

/// A polygon vertex shared by the regions meeting there
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub id: CornerId,
    pub position: DVec2,

    /// Regions meeting at this corner
    pub touches: Vec<RegionId>,
    /// Edges ending at this corner
    pub protrudes: Vec<GraphEdgeId>,
    /// Corners one edge away
    pub adjacent: Vec<CornerId>,

    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    /// Lies on the map rectangle
    pub border: bool,
    pub elevation: f64,
    pub moisture: f64,

    /// Lowest of this corner and its neighbors; itself at a local minimum
    pub downslope: CornerId,
    /// Coastal or ocean corner this one drains toward
    pub watershed: CornerId,
    pub watershed_size: usize,
    /// Number of river passes through this corner
    pub river: u32,
}

impl Corner {
    fn new(id: CornerId, position: DVec2, border: bool) -> Self {
        Self {
            id,
            position,
            touches: Vec::new(),
            protrudes: Vec::new(),
            adjacent: Vec::new(),
            water: false,
            ocean: false,
            coast: false,
            border,
            elevation: 0.0,
            moisture: 0.0,
            downslope: id,
            watershed: id,
            watershed_size: 0,
            river: 0,
        }
    }
}

/// A visible Voronoi edge with the Delaunay pair it separates
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: GraphEdgeId,
    /// Diagram edge this came from
    pub source: usize,
    /// Regions on either side (Delaunay edge)
    pub regions: [RegionId; 2],
    /// Corners at either end (Voronoi edge)
    pub corners: [CornerId; 2],
    pub midpoint: DVec2,
    /// River volume along this edge
    pub river: u32,
}

/// Regions, corners and edges with symmetric adjacency
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct MapGraph {
    pub bounds: Bounds,
    pub regions: Vec<Region>,
    pub corners: Vec<Corner>,
    pub edges: Vec<GraphEdge>,
}

fn push_unique(list: &mut Vec<usize>, value: usize) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl MapGraph {
    /// Build the graph from the visible edges of a diagram
    ///
    /// Endpoints are merged into corners through buckets keyed by
    /// `floor(x)`, checking the neighboring buckets too so that points
    /// straddling a bucket edge still merge.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let mut graph = Self {
            bounds: *diagram.bounds(),
            regions: diagram
                .sites()
                .iter()
                .map(|site| Region::new(site.id, site.position))
                .collect(),
            corners: Vec::new(),
            edges: Vec::new(),
        };
        let mut buckets: HashMap<i64, Vec<CornerId>> = HashMap::new();

        for edge in diagram.visible_edges() {
            let Some([p0, p1]) = edge.clipped else {
                continue;
            };
            let v0 = graph.corner_at(p0, &mut buckets);
            let v1 = graph.corner_at(p1, &mut buckets);
            let [d0, d1] = edge.regions;

            let id = graph.edges.len();
            graph.edges.push(GraphEdge {
                id,
                source: edge.id,
                regions: [d0, d1],
                corners: [v0, v1],
                midpoint: (p0 + p1) * 0.5,
                river: 0,
            });

            graph.regions[d0].borders.push(id);
            graph.regions[d1].borders.push(id);
            push_unique(&mut graph.corners[v0].protrudes, id);
            push_unique(&mut graph.corners[v1].protrudes, id);

            push_unique(&mut graph.regions[d0].neighbors, d1);
            push_unique(&mut graph.regions[d1].neighbors, d0);
            if v0 != v1 {
                push_unique(&mut graph.corners[v0].adjacent, v1);
                push_unique(&mut graph.corners[v1].adjacent, v0);
            }

            for d in [d0, d1] {
                push_unique(&mut graph.regions[d].corners, v0);
                push_unique(&mut graph.regions[d].corners, v1);
            }
            for v in [v0, v1] {
                push_unique(&mut graph.corners[v].touches, d0);
                push_unique(&mut graph.corners[v].touches, d1);
            }
        }

        graph.order_region_boundaries();
        for region in &mut graph.regions {
            region.border = region
                .corners
                .iter()
                .any(|&c| graph.corners[c].border);
        }

        log::debug!(
            "Extracted graph: {} regions, {} corners, {} edges",
            graph.regions.len(),
            graph.corners.len(),
            graph.edges.len()
        );

        graph
    }

    fn corner_at(&mut self, p: DVec2, buckets: &mut HashMap<i64, Vec<CornerId>>) -> CornerId {
        let bucket = p.x.floor() as i64;
        for key in bucket - 1..=bucket + 1 {
            if let Some(ids) = buckets.get(&key) {
                for &id in ids {
                    if self.corners[id].position.distance_squared(p) < CORNER_MERGE_EPSILON {
                        return id;
                    }
                }
            }
        }

        let id = self.corners.len();
        self.corners.push(Corner::new(id, p, self.bounds.on_boundary(p)));
        buckets.entry(bucket).or_default().push(id);
        id
    }

    /// Sort each region's corners and borders by ascending angle around the site
    fn order_region_boundaries(&mut self) {
        for region in &mut self.regions {
            let center = region.position;
            let angle = |p: DVec2| {
                let d = p - center;
                d.y.atan2(d.x)
            };

            let corners = &self.corners;
            region
                .corners
                .sort_by(|&a, &b| angle(corners[a].position).total_cmp(&angle(corners[b].position)));

            let edges = &self.edges;
            region
                .borders
                .sort_by(|&a, &b| angle(edges[a].midpoint).total_cmp(&angle(edges[b].midpoint)));
        }
    }

    /// Move interior corners to the mean of their regions' sites
    ///
    /// Evens out edge lengths after extraction. Border corners stay on the
    /// rectangle. Edge midpoints follow the moved corners.
    pub fn improve_corners(&mut self) {
        let moved: Vec<DVec2> = self
            .corners
            .iter()
            .map(|corner| {
                if corner.border || corner.touches.is_empty() {
                    corner.position
                } else {
                    let sum: DVec2 = corner
                        .touches
                        .iter()
                        .map(|&r| self.regions[r].position)
                        .sum();
                    sum / corner.touches.len() as f64
                }
            })
            .collect();

        for (corner, position) in self.corners.iter_mut().zip(moved) {
            corner.position = position;
        }
        for edge in &mut self.edges {
            let [v0, v1] = edge.corners;
            edge.midpoint = (self.corners[v0].position + self.corners[v1].position) * 0.5;
        }
    }

    /// Edge separating two regions, if they are neighbors
    pub fn edge_between(&self, a: RegionId, b: RegionId) -> Option<GraphEdgeId> {
        self.regions.get(a)?.borders.iter().copied().find(|&e| {
            let [d0, d1] = self.edges[e].regions;
            (d0 == a && d1 == b) || (d0 == b && d1 == a)
        })
    }

    /// Edge joining two corners, if they are adjacent
    pub fn edge_joining(&self, a: CornerId, b: CornerId) -> Option<GraphEdgeId> {
        self.corners.get(a)?.protrudes.iter().copied().find(|&e| {
            let [v0, v1] = self.edges[e].corners;
            (v0 == a && v1 == b) || (v0 == b && v1 == a)
        })
    }

    /// Corner positions of a region in polygon order
    pub fn region_outline(&self, region: RegionId) -> Vec<DVec2> {
        match self.regions.get(region) {
            Some(r) => order_polygon_vertices(
                r.corners.iter().map(|&c| self.corners[c].position).collect(),
                r.position,
            ),
            None => Vec::new(),
        }
    }
}
