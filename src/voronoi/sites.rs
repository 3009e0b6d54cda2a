//! Sites and the ordered site source consumed by the sweep

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use glam::DVec2;

use super::diagram::EdgeId;
use super::geometry::compare_y_then_x;
use crate::error::{MapError, Result};

/// Index of a site in creation order
pub type SiteId = usize;

/// An input point around which a Voronoi region grows
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Creation-order identifier (index into the diagram's site list)
    pub id: SiteId,
    /// Position, fixed once created
    pub position: DVec2,
    /// Diagram edges bounding this site's region, in creation order
    pub edges: Vec<EdgeId>,
}

/// Bit-exact coordinate key; sites are equal when their coordinates are
pub(crate) fn coordinate_key(p: DVec2) -> [u64; 2] {
    // +0.0 and -0.0 are the same site
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()]
}

/// Sorted queue of sites, lowest y (then x) first
#[derive(Debug, Clone)]
pub struct SiteList {
    sites: Vec<Site>,
    order: VecDeque<SiteId>,
    lookup: HashMap<[u64; 2], SiteId>,
}

impl SiteList {
    /// Create sites from raw points, dropping exact duplicates
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteSite` for NaN/infinite coordinates and `NoSites`
    /// when `points` is empty.
    pub fn new(points: &[DVec2]) -> Result<Self> {
        let mut sites = Vec::with_capacity(points.len());
        let mut lookup = HashMap::with_capacity(points.len());

        for &p in points {
            if !p.is_finite() {
                return Err(MapError::NonFiniteSite { x: p.x, y: p.y });
            }
            let id = sites.len();
            if let Entry::Vacant(slot) = lookup.entry(coordinate_key(p)) {
                slot.insert(id);
                sites.push(Site {
                    id,
                    position: p,
                    edges: Vec::new(),
                });
            }
        }

        if sites.is_empty() {
            return Err(MapError::NoSites);
        }

        let mut order: Vec<SiteId> = (0..sites.len()).collect();
        order.sort_by(|&a, &b| compare_y_then_x(sites[a].position, sites[b].position));

        Ok(Self {
            sites,
            order: order.into(),
            lookup,
        })
    }

    /// Pop the lowest remaining site
    pub fn extract_min(&mut self) -> Option<SiteId> {
        self.order.pop_front()
    }

    /// Peek at the lowest remaining site without consuming it
    pub fn peek(&self) -> Option<SiteId> {
        self.order.front().copied()
    }

    /// Number of sites not yet consumed
    pub fn remaining(&self) -> usize {
        self.order.len()
    }

    /// All distinct sites in creation order
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Hand the site storage and coordinate lookup over to the accumulator
    pub(crate) fn take_sites(&mut self) -> (Vec<Site>, HashMap<[u64; 2], SiteId>) {
        (
            std::mem::take(&mut self.sites),
            std::mem::take(&mut self.lookup),
        )
    }

    /// Look up a site by exact coordinates
    pub fn find(&self, p: DVec2) -> Option<SiteId> {
        self.lookup.get(&coordinate_key(p)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sites_pop_in_y_then_x_order() {
        let mut list = SiteList::new(&[
            DVec2::new(5.0, 10.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 0.0),
        ])
        .unwrap();

        assert_eq!(list.remaining(), 3);
        assert_eq!(list.extract_min(), Some(2));
        assert_eq!(list.extract_min(), Some(1));
        assert_eq!(list.peek(), Some(0));
        assert_eq!(list.extract_min(), Some(0));
        assert_eq!(list.extract_min(), None);
    }

    #[test]
    fn test_duplicate_points_collapse() {
        let list = SiteList::new(&[
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(-0.0, 2.0),
            DVec2::new(0.0, 2.0),
        ])
        .unwrap();

        assert_eq!(list.sites().len(), 2);
        assert_eq!(list.sites()[1].id, 1);
        assert_eq!(list.find(DVec2::new(0.0, 2.0)), Some(1));
        assert_eq!(list.find(DVec2::new(3.0, 3.0)), None);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert_eq!(SiteList::new(&[]).unwrap_err(), MapError::NoSites);
        assert!(matches!(
            SiteList::new(&[DVec2::new(f64::NAN, 0.0)]),
            Err(MapError::NonFiniteSite { .. })
        ));
    }
}
