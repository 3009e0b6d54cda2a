//! Delaunay views of a finished diagram
//!
//! Every diagram edge separates two sites; the segment between those sites
//! is a Delaunay edge. Edges that run to infinity on one side separate
//! neighboring hull sites.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;

use super::diagram::{Diagram, EdgeId};
use super::sites::SiteId;

/// Segment between the two sites a diagram edge separates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaunayLine {
    /// Diagram edge this line crosses
    pub edge: EdgeId,
    pub sites: [SiteId; 2],
    pub p0: DVec2,
    pub p1: DVec2,
}

impl DelaunayLine {
    #[inline]
    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

/// Which spanning tree [`Diagram::spanning_tree`] builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanningTreeKind {
    #[default]
    Minimum,
    Maximum,
}

/// Union-find over site ids with path halving and union by size
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
            size: vec![1; count],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already joined
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

impl Diagram {
    fn delaunay_line(&self, edge: EdgeId) -> DelaunayLine {
        let [a, b] = self.edge(edge).regions;
        DelaunayLine {
            edge,
            sites: [a, b],
            p0: self.site(a).position,
            p1: self.site(b).position,
        }
    }

    /// Delaunay triangulation edges, one per diagram edge
    ///
    /// Includes edges whose Voronoi counterpart was clipped away entirely,
    /// so the triangulation covers every site.
    pub fn delaunay_lines(&self) -> Vec<DelaunayLine> {
        (0..self.edges().len()).map(|e| self.delaunay_line(e)).collect()
    }

    /// Delaunay lines whose region boundaries touch one site
    pub fn delaunay_lines_for_site(&self, site: SiteId) -> Vec<DelaunayLine> {
        self.site(site)
            .edges
            .iter()
            .map(|&e| self.delaunay_line(e))
            .collect()
    }

    /// Convex hull edges: Delaunay lines of the unbounded diagram edges
    pub fn hull(&self) -> Vec<DelaunayLine> {
        self.edges()
            .iter()
            .filter(|e| e.endpoints.iter().any(Option::is_none))
            .map(|e| self.delaunay_line(e.id))
            .collect()
    }

    /// Hull sites in boundary order
    ///
    /// The walk starts at an open end when the hull is a chain (collinear
    /// sites), otherwise at the lowest site id, and steps to the lower
    /// unvisited neighbor first.
    pub fn hull_points_in_order(&self) -> Vec<SiteId> {
        let mut adjacency: BTreeMap<SiteId, BTreeSet<SiteId>> = BTreeMap::new();
        for line in self.hull() {
            let [a, b] = line.sites;
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }

        let start = adjacency
            .iter()
            .find(|(_, neighbors)| neighbors.len() == 1)
            .or_else(|| adjacency.iter().next())
            .map(|(&site, _)| site);
        let Some(mut current) = start else {
            return Vec::new();
        };

        let mut visited = BTreeSet::new();
        let mut order = Vec::with_capacity(adjacency.len());
        loop {
            visited.insert(current);
            order.push(current);
            let next = adjacency
                .get(&current)
                .and_then(|neighbors| neighbors.iter().find(|n| !visited.contains(*n)));
            match next {
                Some(&n) => current = n,
                None => break,
            }
        }
        order
    }

    /// Kruskal spanning tree over the Delaunay lines
    ///
    /// Lines are taken shortest first for [`SpanningTreeKind::Minimum`] and
    /// longest first for [`SpanningTreeKind::Maximum`]; equal lengths go in
    /// edge order. A connected set of `n` sites yields `n - 1` lines.
    pub fn spanning_tree(&self, kind: SpanningTreeKind) -> Vec<DelaunayLine> {
        let mut lines = self.delaunay_lines();
        lines.sort_by(|a, b| {
            let by_length = match kind {
                SpanningTreeKind::Minimum => a.length().total_cmp(&b.length()),
                SpanningTreeKind::Maximum => b.length().total_cmp(&a.length()),
            };
            by_length.then(a.edge.cmp(&b.edge))
        });

        let mut sets = DisjointSet::new(self.sites().len());
        lines
            .into_iter()
            .filter(|line| sets.union(line.sites[0], line.sites[1]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::{Bounds, Voronoi};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn triangle() -> Diagram {
        Voronoi::compute(
            &[
                DVec2::new(0.0, 0.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(5.0, 10.0),
            ],
            Bounds::square(10.0).unwrap(),
        )
        .unwrap()
    }

    fn random(count: usize, seed: u64) -> Diagram {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<DVec2> = (0..count)
            .map(|_| DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        Voronoi::compute(&points, Bounds::square(100.0).unwrap()).unwrap()
    }

    #[test]
    fn test_triangle_delaunay_and_hull() {
        let diagram = triangle();

        let lines = diagram.delaunay_lines();
        assert_eq!(lines.len(), 3);
        let mut pairs: Vec<[SiteId; 2]> = lines
            .iter()
            .map(|l| {
                let mut s = l.sites;
                s.sort_unstable();
                s
            })
            .collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![[0, 1], [0, 2], [1, 2]]);

        assert_eq!(diagram.hull().len(), 3);
        let mut hull = diagram.hull_points_in_order();
        assert_eq!(hull.len(), 3);
        hull.sort_unstable();
        assert_eq!(hull, vec![0, 1, 2]);

        assert_eq!(diagram.delaunay_lines_for_site(0).len(), 2);
    }

    #[test]
    fn test_triangle_spanning_trees() {
        let diagram = triangle();

        // Base 10, both sides sqrt(125)
        let min = diagram.spanning_tree(SpanningTreeKind::Minimum);
        assert_eq!(min.len(), 2);
        assert!(min.iter().any(|l| (l.length() - 10.0).abs() < 1e-12));

        let max = diagram.spanning_tree(SpanningTreeKind::Maximum);
        assert_eq!(max.len(), 2);
        assert!(max.iter().all(|l| (l.length() - 125f64.sqrt()).abs() < 1e-12));
    }

    #[test]
    fn test_spanning_tree_spans_all_sites() {
        let diagram = random(120, 4);
        let n = diagram.sites().len();

        let min = diagram.spanning_tree(SpanningTreeKind::Minimum);
        let max = diagram.spanning_tree(SpanningTreeKind::Maximum);
        assert_eq!(min.len(), n - 1);
        assert_eq!(max.len(), n - 1);

        let mut touched = vec![false; n];
        for line in &min {
            touched[line.sites[0]] = true;
            touched[line.sites[1]] = true;
        }
        assert!(touched.iter().all(|&t| t));

        let total = |tree: &[DelaunayLine]| tree.iter().map(DelaunayLine::length).sum::<f64>();
        assert!(total(&min) < total(&max));

        // The shortest Delaunay line always belongs to the minimum tree
        let shortest = diagram
            .delaunay_lines()
            .into_iter()
            .min_by(|a, b| a.length().total_cmp(&b.length()))
            .unwrap();
        assert!(min.iter().any(|l| l.edge == shortest.edge));
    }

    #[test]
    fn test_hull_of_square_with_centre() {
        let diagram = Voronoi::compute(
            &[
                DVec2::new(20.0, 20.0),
                DVec2::new(80.0, 21.0),
                DVec2::new(81.0, 80.0),
                DVec2::new(19.0, 79.0),
                DVec2::new(50.0, 50.0),
            ],
            Bounds::square(100.0).unwrap(),
        )
        .unwrap();
        let centre = diagram.find_site(DVec2::new(50.0, 50.0)).unwrap();

        let hull = diagram.hull_points_in_order();
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&centre));

        // Consecutive hull sites share a hull edge
        let lines = diagram.hull();
        for i in 0..hull.len() {
            let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
            assert!(lines
                .iter()
                .any(|l| l.sites == [a, b] || l.sites == [b, a]));
        }
    }

    #[test]
    fn test_collinear_hull_is_a_chain() {
        let points: Vec<DVec2> = (0..4).map(|i| DVec2::new(10.0 + 20.0 * i as f64, 50.0)).collect();
        let diagram = Voronoi::compute(&points, Bounds::square(100.0).unwrap()).unwrap();

        let hull = diagram.hull_points_in_order();
        assert_eq!(hull.len(), 4);
        let xs: Vec<f64> = hull.iter().map(|&s| diagram.site(s).position.x).collect();
        assert!(xs == vec![10.0, 30.0, 50.0, 70.0] || xs == vec![70.0, 50.0, 30.0, 10.0]);
    }
}
