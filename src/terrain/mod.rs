//! Island shapes, noise and biome classification
//!
//! An island shape decides land versus water for each corner before any
//! graph-relative pass runs; the biome table assigns the final tag per
//! region once elevation and moisture are known.

mod biome;
mod island;
mod perlin;

pub use biome::Biome;
pub use island::{BlobIsland, IslandShape, PerlinIsland, RadialIsland, SquareIsland};
pub use perlin::{sample_perlin_2d, PerlinConfig};

use std::str::FromStr;

use crate::error::MapError;

/// Named island shape, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IslandShapeKind {
    /// Bumpy ring with a bay
    #[default]
    Radial,
    /// Round body with two lakes for eyes
    Blob,
    /// The whole map is land
    Square,
    /// Fractal noise, sparser toward the edge
    Perlin,
}

impl IslandShapeKind {
    pub const ALL: [IslandShapeKind; 4] = [
        IslandShapeKind::Radial,
        IslandShapeKind::Blob,
        IslandShapeKind::Square,
        IslandShapeKind::Perlin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IslandShapeKind::Radial => "radial",
            IslandShapeKind::Blob => "blob",
            IslandShapeKind::Square => "square",
            IslandShapeKind::Perlin => "perlin",
        }
    }

    /// Instantiate the shape for an island seed
    ///
    /// Only the radial and noise shapes use the seed.
    pub fn build(&self, seed: u32) -> Box<dyn IslandShape> {
        match self {
            IslandShapeKind::Radial => Box::new(RadialIsland::new(seed)),
            IslandShapeKind::Blob => Box::new(BlobIsland),
            IslandShapeKind::Square => Box::new(SquareIsland),
            IslandShapeKind::Perlin => Box::new(PerlinIsland::new(seed)),
        }
    }
}

impl FromStr for IslandShapeKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MapError::UnknownIslandShape(s.to_string()))
    }
}

impl std::fmt::Display for IslandShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_parse_names() {
        assert_eq!("radial".parse::<IslandShapeKind>(), Ok(IslandShapeKind::Radial));
        assert_eq!("Blob".parse::<IslandShapeKind>(), Ok(IslandShapeKind::Blob));
        assert_eq!(" square ".parse::<IslandShapeKind>(), Ok(IslandShapeKind::Square));
        assert_eq!("perlin".parse::<IslandShapeKind>(), Ok(IslandShapeKind::Perlin));
        assert_eq!(
            "volcano".parse::<IslandShapeKind>(),
            Err(MapError::UnknownIslandShape("volcano".to_string()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for kind in IslandShapeKind::ALL {
            assert_eq!(kind.to_string().parse::<IslandShapeKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_build_dispatches() {
        let square = IslandShapeKind::Square.build(1);
        assert!(square.is_land(DVec2::new(0.99, -0.99)));

        let radial = IslandShapeKind::Radial.build(1);
        assert!(radial.is_land(DVec2::ZERO));
        assert!(!radial.is_land(DVec2::new(1.0, 1.0)));
    }
}
