//! Spatial indexing for fast position-to-region lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree over region sites
///
/// Nearest site is the same as "region containing the point" for an
/// unclipped Voronoi diagram, so one nearest-neighbor query answers map
/// picking.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build the index from site positions (index = region id)
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_island::*;
    /// use glam::DVec2;
    ///
    /// let sites = vec![
    ///     DVec2::new(10.0, 10.0),
    ///     DVec2::new(90.0, 10.0),
    ///     DVec2::new(50.0, 90.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(DVec2::new(80.0, 20.0)), 1);
    /// ```
    pub fn new(sites: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Id of the site nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        result.item as usize
    }
}
