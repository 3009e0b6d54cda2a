//! Biome decision table

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-region terrain classification
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Biome {
    #[default]
    Ocean,
    Marsh,
    Ice,
    Lake,
    Beach,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    TropicalRainForest,
    TropicalSeasonalForest,
    SubtropicalDesert,
}

impl Biome {
    /// Every biome, in declaration order
    pub const ALL: [Biome; 18] = [
        Biome::Ocean,
        Biome::Marsh,
        Biome::Ice,
        Biome::Lake,
        Biome::Beach,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::TemperateDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::Grassland,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
        Biome::SubtropicalDesert,
    ];

    /// Pick a biome from water flags and the elevation/moisture bands
    ///
    /// Ocean wins over water, water over coast. Land is split into four
    /// elevation bands (above 0.8, 0.6, 0.3, rest), each with its own
    /// moisture thresholds.
    pub fn classify(ocean: bool, water: bool, coast: bool, elevation: f64, moisture: f64) -> Biome {
        if ocean {
            return Biome::Ocean;
        }
        if water {
            return if elevation < 0.1 {
                Biome::Marsh
            } else if elevation > 0.8 {
                Biome::Ice
            } else {
                Biome::Lake
            };
        }
        if coast {
            return Biome::Beach;
        }

        if elevation > 0.8 {
            if moisture > 0.50 {
                Biome::Snow
            } else if moisture > 0.33 {
                Biome::Tundra
            } else if moisture > 0.16 {
                Biome::Bare
            } else {
                Biome::Scorched
            }
        } else if elevation > 0.6 {
            if moisture > 0.66 {
                Biome::Taiga
            } else if moisture > 0.33 {
                Biome::Shrubland
            } else {
                Biome::TemperateDesert
            }
        } else if elevation > 0.3 {
            if moisture > 0.83 {
                Biome::TemperateRainForest
            } else if moisture > 0.50 {
                Biome::TemperateDeciduousForest
            } else if moisture > 0.16 {
                Biome::Grassland
            } else {
                Biome::TemperateDesert
            }
        } else if moisture > 0.66 {
            Biome::TropicalRainForest
        } else if moisture > 0.33 {
            Biome::TropicalSeasonalForest
        } else if moisture > 0.16 {
            Biome::Grassland
        } else {
            Biome::SubtropicalDesert
        }
    }

    /// Ocean, lake, marsh and ice
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake | Biome::Marsh | Biome::Ice)
    }

    pub fn is_land(&self) -> bool {
        !self.is_water()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Marsh => "Marsh",
            Biome::Ice => "Ice",
            Biome::Lake => "Lake",
            Biome::Beach => "Beach",
            Biome::Snow => "Snow",
            Biome::Tundra => "Tundra",
            Biome::Bare => "Bare",
            Biome::Scorched => "Scorched",
            Biome::Taiga => "Taiga",
            Biome::Shrubland => "Shrubland",
            Biome::TemperateDesert => "Temperate Desert",
            Biome::TemperateRainForest => "Temperate Rain Forest",
            Biome::TemperateDeciduousForest => "Temperate Deciduous Forest",
            Biome::Grassland => "Grassland",
            Biome::TropicalRainForest => "Tropical Rain Forest",
            Biome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            Biome::SubtropicalDesert => "Subtropical Desert",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
