//! Lloyd's Relaxation for uniform point distribution
//!
//! Lloyd's Relaxation iteratively evens out the point distribution by moving
//! each point to the centre of its clipped Voronoi region.

use std::time::Instant;

use glam::DVec2;

use crate::error::Result;
use crate::voronoi::{Bounds, Voronoi};

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this value
    /// (as a fraction of the larger map side). Set to 0.0 to disable early
    /// termination.
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply Lloyd's Relaxation with a fixed iteration count
///
/// # Errors
///
/// Fails only if the points cannot form a diagram (empty or non-finite).
pub fn lloyd_relaxation(points: Vec<DVec2>, bounds: &Bounds, iterations: usize) -> Result<Vec<DVec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// For each iteration:
/// 1. Sweep a diagram over the current points
/// 2. Collect every site's clipped region polygon
/// 3. Move each site to the average of its polygon's vertices
///
/// Exact duplicate points collapse into one site on the first iteration.
pub fn lloyd_relaxation_with_options(
    mut points: Vec<DVec2>,
    bounds: &Bounds,
    options: LloydOptions,
) -> Result<Vec<DVec2>> {
    let convergence_threshold = options.convergence_threshold * bounds.width.max(bounds.height);
    let total_start = Instant::now();

    log::debug!(
        "Lloyd: {} points, max {} iterations, threshold {:.4} (abs: {:.4})",
        points.len(),
        options.max_iterations,
        options.convergence_threshold,
        convergence_threshold
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let diagram = Voronoi::compute(&points, *bounds)?;
        let polygons = diagram.region_polygons();

        let (new_points, max_displacement) = compute_new_points(
            diagram.sites().iter().map(|s| s.position),
            &polygons,
        );

        points = new_points;
        iterations_run = iteration + 1;

        log::debug!(
            "Lloyd iter {}: {:?}, max_disp={:.4}",
            iteration + 1,
            iter_start.elapsed(),
            max_displacement
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            break;
        }
    }

    log::debug!(
        "Lloyd finished: {} iterations (of max {}), converged={}, total={:?}",
        iterations_run,
        options.max_iterations,
        converged,
        total_start.elapsed()
    );

    Ok(points)
}

/// Move each site to its polygon's vertex average and track the largest move
fn compute_new_points(
    sites: impl Iterator<Item = DVec2>,
    polygons: &[Vec<DVec2>],
) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;

    let new_points = sites
        .zip(polygons)
        .map(|(old, polygon)| {
            if polygon.is_empty() {
                return old;
            }
            let sum: DVec2 = polygon.iter().copied().sum();
            let centre = sum / polygon.len() as f64;

            max_displacement = max_displacement.max(centre.distance(old));
            centre
        })
        .collect();

    (new_points, max_displacement)
}
