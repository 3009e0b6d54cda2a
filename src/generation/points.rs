//! Random site placement

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{MapError, Result};
use crate::voronoi::Bounds;

/// Scatter `count` points uniformly inside `bounds`, `margin` away from
/// every side
///
/// Points are drawn from `rng` as x then y, so the same stream state always
/// gives the same points.
///
/// # Errors
///
/// Returns `InvalidConfig` when the margin leaves no room inside `bounds`.
pub fn generate_random_points(
    count: usize,
    bounds: &Bounds,
    margin: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<DVec2>> {
    let (x_min, x_max) = (bounds.left + margin, bounds.right() - margin);
    let (y_min, y_max) = (bounds.top + margin, bounds.bottom() - margin);
    if !(margin >= 0.0) || !(x_min < x_max) || !(y_min < y_max) {
        return Err(MapError::InvalidConfig(format!(
            "margin {} leaves no room inside a {}x{} map",
            margin, bounds.width, bounds.height
        )));
    }

    Ok((0..count)
        .map(|_| {
            let x = rng.gen_range(x_min..x_max);
            let y = rng.gen_range(y_min..y_max);
            DVec2::new(x, y)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_points_respect_margin() {
        let bounds = Bounds::square(100.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let points = generate_random_points(500, &bounds, 10.0, &mut rng).unwrap();

        assert_eq!(points.len(), 500);
        for p in points {
            assert!(p.x >= 10.0 && p.x < 90.0);
            assert!(p.y >= 10.0 && p.y < 90.0);
        }
    }

    #[test]
    fn test_points_are_deterministic() {
        let bounds = Bounds::square(100.0).unwrap();
        let a = generate_random_points(50, &bounds, 0.0, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = generate_random_points(50, &bounds, 0.0, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let c = generate_random_points(50, &bounds, 0.0, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_margin_too_large() {
        let bounds = Bounds::square(20.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generate_random_points(5, &bounds, 10.0, &mut rng).is_err());
        assert!(generate_random_points(5, &bounds, -1.0, &mut rng).is_err());
    }
}
