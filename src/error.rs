//! Error types for diagram construction and map generation

use thiserror::Error;

/// Errors that can occur while building a diagram or generating a map
///
/// Only caller input is validated. Numerical near-degeneracies inside the
/// sweep are absorbed by tolerances and never reach this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The diagram was given no sites at all
    #[error("at least one site is required")]
    NoSites,

    /// A site coordinate was NaN or infinite
    #[error("site ({x}, {y}) is not finite")]
    NonFiniteSite { x: f64, y: f64 },

    /// The bounding rectangle has zero or negative area
    #[error("bounding rectangle {width}x{height} has no area")]
    DegenerateBounds { width: f64, height: f64 },

    /// Island shape name not recognised
    #[error("unknown island shape: {0:?}")]
    UnknownIslandShape(String),

    /// Too few distinct points to build a polygon map
    #[error("map generation needs at least {required} distinct points (got {got})")]
    NotEnoughPoints { required: usize, got: usize },
}

/// Result type alias for diagram and map operations
pub type Result<T> = std::result::Result<T, MapError>;
