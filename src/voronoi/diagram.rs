//! Diagram accumulator
//!
//! Collects everything the sweep emits: consumed sites, Voronoi vertices,
//! bisector edges and their rectangle-clipped segments, plus the Delaunay
//! triples behind each vertex. A host animating the sweep reads this after
//! every step; the `fresh` flags mark what the last step produced.

use std::collections::HashMap;

use glam::DVec2;

use super::clip::clip_segment;
use super::geometry::{bisect, Bisector, Bounds, Side};
use super::sites::{coordinate_key, Site, SiteId};

/// Index of a diagram edge in creation order
pub type EdgeId = usize;
/// Index of a Voronoi vertex in emission order
pub type VertexId = usize;

/// Tolerance used when merging polygon vertices that coincide
const POLYGON_MERGE_EPSILON: f64 = 1e-9;

/// A Voronoi edge: part of the bisector between two sites
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    /// Line coefficients and the two sites they were built from
    pub bisector: Bisector,
    /// Bounding sites, `[left, right]`
    pub regions: [SiteId; 2],
    /// Resolved Voronoi vertices, `[left, right]`; `None` runs to infinity
    pub endpoints: [Option<VertexId>; 2],
    /// Endpoints after clipping to the output rectangle
    pub clipped: Option<[DVec2; 2]>,
    resolved: bool,
}

impl Edge {
    /// An edge is visible once both clipped endpoints exist
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.clipped.is_some()
    }

    /// True once clipping has been attempted (visible or discarded)
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// A clipped edge ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub edge: EdgeId,
    pub p0: DVec2,
    pub p1: DVec2,
    /// Produced by the most recent step
    pub fresh: bool,
}

/// Three sites whose circumcircle produced a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub sites: [SiteId; 3],
    pub fresh: bool,
}

/// Output of the sweep
#[derive(Debug, Clone)]
pub struct Diagram {
    bounds: Bounds,
    sites: Vec<Site>,
    site_lookup: HashMap<[u64; 2], SiteId>,
    emitted_sites: Vec<SiteId>,
    vertices: Vec<DVec2>,
    edges: Vec<Edge>,
    segments: Vec<Segment>,
    triangles: Vec<Triangle>,
    sweep_line: f64,
}

impl Diagram {
    pub(crate) fn new(bounds: Bounds, sites: Vec<Site>, site_lookup: HashMap<[u64; 2], SiteId>) -> Self {
        Self {
            bounds,
            sites,
            site_lookup,
            emitted_sites: Vec::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            segments: Vec::new(),
            triangles: Vec::new(),
            sweep_line: f64::NEG_INFINITY,
        }
    }

    // ------------------------------------------------------------------
    // Emission (driven by the sweep)
    // ------------------------------------------------------------------

    pub(crate) fn plot_site(&mut self, site: SiteId) {
        self.emitted_sites.push(site);
        let y = self.sites[site].position.y;
        if y > self.sweep_line {
            self.sweep_line = y;
        }
    }

    pub(crate) fn set_sweep_line(&mut self, y: f64) {
        self.sweep_line = y;
    }

    pub(crate) fn plot_vertex(&mut self, p: DVec2) -> VertexId {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    pub(crate) fn plot_triple(&mut self, a: SiteId, b: SiteId, c: SiteId) {
        self.triangles.push(Triangle {
            sites: [a, b, c],
            fresh: true,
        });
    }

    /// Create the bisector edge between two sites
    pub(crate) fn bisect(&mut self, s1: SiteId, s2: SiteId) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            bisector: bisect(self.sites[s1].position, self.sites[s2].position),
            regions: [s1, s2],
            endpoints: [None, None],
            clipped: None,
            resolved: false,
        });
        self.sites[s1].edges.push(id);
        self.sites[s2].edges.push(id);
        id
    }

    /// Attach a vertex to one end of an edge; clips once both ends are known
    pub(crate) fn set_endpoint(&mut self, edge: EdgeId, side: Side, vertex: VertexId) {
        self.edges[edge].endpoints[side.index()] = Some(vertex);
        if self.edges[edge].endpoints[side.opposite().index()].is_some() {
            self.resolve_edge(edge);
        }
    }

    /// Clip an edge against the output rectangle, at most once
    pub(crate) fn resolve_edge(&mut self, edge: EdgeId) {
        if self.edges[edge].resolved {
            return;
        }
        let clipped = self.clip_edge(&self.edges[edge]);
        let e = &mut self.edges[edge];
        e.resolved = true;
        if let Some((p0, p1)) = clipped {
            e.clipped = Some([p0, p1]);
            self.segments.push(Segment {
                edge,
                p0,
                p1,
                fresh: true,
            });
        }
    }

    /// Clip every edge that has not been clipped yet
    pub(crate) fn resolve_all(&mut self) {
        for edge in 0..self.edges.len() {
            self.resolve_edge(edge);
        }
    }

    pub(crate) fn reset_fresh(&mut self) {
        self.segments.iter_mut().for_each(|s| s.fresh = false);
        self.triangles.iter_mut().for_each(|t| t.fresh = false);
    }

    /// Turn an edge with possibly missing endpoints into a finite segment
    /// spanning the rectangle, then clip it.
    ///
    /// Steep lines are walked along y, shallow ones along x. A missing
    /// endpoint is replaced by the rectangle's extent in that direction.
    fn clip_edge(&self, edge: &Edge) -> Option<(DVec2, DVec2)> {
        let line = edge.bisector.line;
        let bounds = &self.bounds;
        let endpoint = |side: Side| edge.endpoints[side.index()].map(|v| self.vertices[v]);

        let (s1, s2) = if line.is_steep() && line.b >= 0.0 {
            (endpoint(Side::Right), endpoint(Side::Left))
        } else {
            (endpoint(Side::Left), endpoint(Side::Right))
        };

        let (p1, p2) = if line.is_steep() {
            let y1 = s1.map_or(bounds.top, |p| p.y);
            let y2 = s2.map_or(bounds.bottom(), |p| p.y);
            if (s1.is_none() && y2 < bounds.top) || (s2.is_none() && y1 > bounds.bottom()) {
                return None;
            }
            (
                s1.unwrap_or_else(|| DVec2::new(line.c - line.b * y1, y1)),
                s2.unwrap_or_else(|| DVec2::new(line.c - line.b * y2, y2)),
            )
        } else {
            let x1 = s1.map_or(bounds.left, |p| p.x);
            let x2 = s2.map_or(bounds.right(), |p| p.x);
            if (s1.is_none() && x2 < bounds.left) || (s2.is_none() && x1 > bounds.right()) {
                return None;
            }
            (
                s1.unwrap_or_else(|| DVec2::new(x1, line.c - line.a * x1)),
                s2.unwrap_or_else(|| DVec2::new(x2, line.c - line.a * x2)),
            )
        };

        clip_segment(p1, p2, bounds)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// All distinct input sites in creation order
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id]
    }

    /// Find the site with exactly these coordinates
    pub fn find_site(&self, p: DVec2) -> Option<SiteId> {
        self.site_lookup.get(&coordinate_key(p)).copied()
    }

    /// Sites in the order the sweep consumed them
    #[inline]
    pub fn emitted_sites(&self) -> &[SiteId] {
        &self.emitted_sites
    }

    /// Voronoi vertices in emission order
    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Edges that survived clipping
    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_visible())
    }

    /// Clipped segments in the order they were produced
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Current sweep-line position
    #[inline]
    pub fn sweep_line(&self) -> f64 {
        self.sweep_line
    }

    /// Site nearest to each rectangle corner (ties go to the lower id)
    fn corner_owners(&self) -> [SiteId; 4] {
        self.bounds.corners().map(|corner| {
            self.sites
                .iter()
                .min_by(|a, b| {
                    let da = a.position.distance_squared(corner);
                    let db = b.position.distance_squared(corner);
                    da.total_cmp(&db).then(a.id.cmp(&b.id))
                })
                .map_or(0, |s| s.id)
        })
    }

    fn collect_polygon(&self, site: SiteId, owners: &[SiteId; 4]) -> Vec<DVec2> {
        let mut points: Vec<DVec2> = Vec::new();
        let mut push = |p: DVec2| {
            if !points.iter().any(|q| q.distance_squared(p) < POLYGON_MERGE_EPSILON) {
                points.push(p);
            }
        };

        for &edge in &self.sites[site].edges {
            if let Some([p0, p1]) = self.edges[edge].clipped {
                push(p0);
                push(p1);
            }
        }
        for (corner, &owner) in self.bounds.corners().iter().zip(owners.iter()) {
            if owner == site {
                push(*corner);
            }
        }

        order_polygon_vertices(points, self.sites[site].position)
    }

    /// Clipped polygon of one site's region, ordered as by
    /// [`order_polygon_vertices`]
    ///
    /// Made of the clipped endpoints of the site's edges plus any rectangle
    /// corners the site owns.
    pub fn region_polygon(&self, site: SiteId) -> Vec<DVec2> {
        let owners = self.corner_owners();
        self.collect_polygon(site, &owners)
    }

    /// Clipped polygons of every site, indexed by site id
    pub fn region_polygons(&self) -> Vec<Vec<DVec2>> {
        let owners = self.corner_owners();
        (0..self.sites.len())
            .map(|site| self.collect_polygon(site, &owners))
            .collect()
    }
}

/// Order polygon vertices by ascending `atan2` angle around `center`
///
/// The first vertex is the one just past the negative x axis (angle near
/// -π) and the last sits on or near it (angle π). That is counter-clockwise
/// with y up, and clockwise on screen where y grows downward.
pub(crate) fn order_polygon_vertices(vertices: Vec<DVec2>, center: DVec2) -> Vec<DVec2> {
    if vertices.len() < 3 {
        return vertices;
    }

    let mut with_angles: Vec<(DVec2, f64)> = vertices
        .into_iter()
        .map(|v| {
            let d = v - center;
            (v, d.y.atan2(d.x))
        })
        .collect();

    with_angles.sort_by(|a, b| a.1.total_cmp(&b.1));

    with_angles.into_iter().map(|(v, _)| v).collect()
}
