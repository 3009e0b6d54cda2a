//! Beachline (active edge list)
//!
//! A doubly linked list of half-edges stored in an arena. Two permanent
//! sentinels bound the list; removed nodes go on a free list and are reused,
//! so splicing is O(1) without any reference cycles.

use glam::DVec2;

use super::diagram::{Diagram, EdgeId};
use super::geometry::{is_right_of, Side};
use super::sites::SiteId;

/// Index of a half-edge node in the beachline arena
pub type HalfEdgeId = usize;

/// One boundary between two arcs of the beachline
#[derive(Debug, Clone)]
pub struct HalfEdge {
    /// Diagram edge this boundary traces (`None` for the sentinels)
    pub edge: Option<EdgeId>,
    /// Which side of the edge's bisector this boundary is
    pub side: Side,
    /// Predicted circle-event vertex, while one is queued
    pub vertex: Option<DVec2>,
    /// Sweep position at which the predicted event fires
    pub ystar: f64,
    left: HalfEdgeId,
    right: HalfEdgeId,
}

impl HalfEdge {
    fn detached(edge: Option<EdgeId>, side: Side) -> Self {
        Self {
            edge,
            side,
            vertex: None,
            ystar: 0.0,
            left: 0,
            right: 0,
        }
    }
}

/// Arena-backed doubly linked beachline
#[derive(Debug, Clone)]
pub struct Beachline {
    nodes: Vec<HalfEdge>,
    free: Vec<HalfEdgeId>,
}

impl Beachline {
    /// Left sentinel, always first
    pub const LEFT_END: HalfEdgeId = 0;
    /// Right sentinel, always last
    pub const RIGHT_END: HalfEdgeId = 1;

    pub fn new() -> Self {
        let mut left = HalfEdge::detached(None, Side::Left);
        let mut right = HalfEdge::detached(None, Side::Left);
        left.left = Self::LEFT_END;
        left.right = Self::RIGHT_END;
        right.left = Self::LEFT_END;
        right.right = Self::RIGHT_END;

        Self {
            nodes: vec![left, right],
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn get(&self, he: HalfEdgeId) -> &HalfEdge {
        &self.nodes[he]
    }

    #[inline]
    pub fn get_mut(&mut self, he: HalfEdgeId) -> &mut HalfEdge {
        &mut self.nodes[he]
    }

    #[inline]
    pub fn left_of(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.nodes[he].left
    }

    #[inline]
    pub fn right_of(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.nodes[he].right
    }

    /// True when only the two sentinels remain
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::LEFT_END].right == Self::RIGHT_END
    }

    /// Number of interior half-edges
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut he = self.right_of(Self::LEFT_END);
        while he != Self::RIGHT_END {
            count += 1;
            he = self.right_of(he);
        }
        count
    }

    /// Create a half-edge and splice it in directly right of `lb`
    pub fn insert_after(&mut self, lb: HalfEdgeId, edge: EdgeId, side: Side) -> HalfEdgeId {
        let mut node = HalfEdge::detached(Some(edge), side);
        let rb = self.nodes[lb].right;
        node.left = lb;
        node.right = rb;

        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.nodes[rb].left = id;
        self.nodes[lb].right = id;
        id
    }

    /// Unlink `he` and return its slot to the free list
    pub fn delete(&mut self, he: HalfEdgeId) {
        debug_assert!(he != Self::LEFT_END && he != Self::RIGHT_END);
        let (left, right) = (self.nodes[he].left, self.nodes[he].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let node = &mut self.nodes[he];
        node.edge = None;
        node.vertex = None;
        self.free.push(he);
    }

    /// Half-edge immediately left of the arc above `p`
    ///
    /// Linear scan from the left sentinel.
    pub fn left_bound(&self, p: DVec2, diagram: &Diagram) -> HalfEdgeId {
        let mut he = Self::LEFT_END;
        loop {
            he = self.right_of(he);
            if he == Self::RIGHT_END {
                break;
            }
            let node = &self.nodes[he];
            let right = match node.edge {
                Some(edge) => is_right_of(&diagram.edge(edge).bisector, node.side, p),
                None => false,
            };
            if !right {
                break;
            }
        }
        self.left_of(he)
    }

    /// Site whose arc lies left of `he`
    pub fn left_region(&self, he: HalfEdgeId, diagram: &Diagram, bottom: SiteId) -> SiteId {
        let node = &self.nodes[he];
        match node.edge {
            Some(edge) => diagram.edge(edge).regions[node.side.index()],
            None => bottom,
        }
    }

    /// Site whose arc lies right of `he`
    pub fn right_region(&self, he: HalfEdgeId, diagram: &Diagram, bottom: SiteId) -> SiteId {
        let node = &self.nodes[he];
        match node.edge {
            Some(edge) => diagram.edge(edge).regions[node.side.opposite().index()],
            None => bottom,
        }
    }
}

impl Default for Beachline {
    fn default() -> Self {
        Self::new()
    }
}
