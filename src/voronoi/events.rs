//! Circle-event queue
//!
//! Predicted vertex events kept in a flat insertion-sorted list. Ordering is
//! smaller `ystar` first, then smaller vertex x, then insertion order. At the
//! site counts this crate targets a linear insert is cheaper than a heap
//! with removal support.

use glam::DVec2;

use super::beachline::{Beachline, HalfEdgeId};
use super::geometry::TOLERANCE;

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<HalfEdgeId>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a circle event for `he` at `vertex`, firing at `vertex.y + offset`
    ///
    /// The prediction is stored on the half-edge itself.
    pub fn insert(&mut self, beachline: &mut Beachline, he: HalfEdgeId, vertex: DVec2, offset: f64) {
        let ystar = vertex.y + offset;
        {
            let node = beachline.get_mut(he);
            node.vertex = Some(vertex);
            node.ystar = ystar;
        }

        let position = self
            .events
            .iter()
            .position(|&other| {
                let next = beachline.get(other);
                let next_x = next.vertex.map_or(f64::INFINITY, |v| v.x);
                let later = ystar > next.ystar
                    || ((ystar - next.ystar).abs() < TOLERANCE && vertex.x >= next_x);
                !later
            })
            .unwrap_or(self.events.len());

        self.events.insert(position, he);
    }

    /// Drop any event queued for `he`
    pub fn delete(&mut self, beachline: &mut Beachline, he: HalfEdgeId) {
        if let Some(index) = self.events.iter().position(|&other| other == he) {
            self.events.remove(index);
            beachline.get_mut(he).vertex = None;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Key of the earliest event as `(vertex.x, ystar)`
    pub fn min(&self, beachline: &Beachline) -> Option<DVec2> {
        self.events.first().map(|&he| {
            let node = beachline.get(he);
            let x = node.vertex.map_or(f64::INFINITY, |v| v.x);
            DVec2::new(x, node.ystar)
        })
    }

    /// Remove and return the earliest event's half-edge
    pub fn extract_min(&mut self) -> Option<HalfEdgeId> {
        if self.events.is_empty() {
            None
        } else {
            Some(self.events.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::geometry::Side;

    fn three_half_edges() -> (Beachline, [HalfEdgeId; 3]) {
        let mut beachline = Beachline::new();
        let a = beachline.insert_after(Beachline::LEFT_END, 0, Side::Left);
        let b = beachline.insert_after(a, 1, Side::Left);
        let c = beachline.insert_after(b, 2, Side::Left);
        (beachline, [a, b, c])
    }

    #[test]
    fn test_events_pop_by_ystar() {
        let (mut beachline, [a, b, c]) = three_half_edges();
        let mut queue = EventQueue::new();
        queue.insert(&mut beachline, a, DVec2::new(0.0, 5.0), 5.0);
        queue.insert(&mut beachline, b, DVec2::new(0.0, 1.0), 1.0);
        queue.insert(&mut beachline, c, DVec2::new(0.0, 3.0), 0.0);

        assert_eq!(queue.min(&beachline), Some(DVec2::new(0.0, 2.0)));
        assert_eq!(queue.extract_min(), Some(b));
        assert_eq!(queue.extract_min(), Some(c));
        assert_eq!(queue.extract_min(), Some(a));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_break_on_x_then_insertion_order() {
        let (mut beachline, [a, b, c]) = three_half_edges();
        let mut queue = EventQueue::new();
        queue.insert(&mut beachline, a, DVec2::new(4.0, 2.0), 1.0);
        queue.insert(&mut beachline, b, DVec2::new(1.0, 2.0), 1.0);
        queue.insert(&mut beachline, c, DVec2::new(4.0, 2.0), 1.0);

        assert_eq!(queue.extract_min(), Some(b));
        assert_eq!(queue.extract_min(), Some(a));
        assert_eq!(queue.extract_min(), Some(c));
    }

    #[test]
    fn test_delete_clears_prediction() {
        let (mut beachline, [a, b, _]) = three_half_edges();
        let mut queue = EventQueue::new();
        queue.insert(&mut beachline, a, DVec2::new(0.0, 1.0), 1.0);
        queue.insert(&mut beachline, b, DVec2::new(0.0, 2.0), 1.0);

        queue.delete(&mut beachline, a);
        assert_eq!(queue.len(), 1);
        assert!(beachline.get(a).vertex.is_none());
        assert_eq!(queue.extract_min(), Some(b));

        // Deleting something not queued is a no-op
        queue.delete(&mut beachline, a);
        assert!(queue.is_empty());
    }
}
