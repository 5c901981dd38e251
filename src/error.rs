//! Error types
//!
//! Everything here is raised at setup time or by a pure query. Nothing in the
//! per-tick stepping path can fail except being asked to step a finished run.

use thiserror::Error;

/// Geometry that has no well-defined answer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("mirrors must satisfy left < right (got left={left}, right={right})")]
    DegenerateMirrors { left: f32, right: f32 },

    #[error("room must have left < right and top < bottom")]
    EmptyRoom,

    #[error("radius and wall thickness must be non-negative (got {0})")]
    NegativeRadius(f32),

    #[error("geometry contains a non-finite coordinate")]
    NonFinite,

    /// The sight line from the observer to an image is parallel to the mirrors
    #[error("sight line is parallel to the mirror plane (x = {x})")]
    VerticalSightLine { x: f32 },

    /// A floor mirror defined by two coincident points has no direction
    #[error("mirror line endpoints coincide")]
    DegenerateMirrorLine,

    #[error("photon speed must be positive and finite (got {0})")]
    NonPositiveSpeed(f32),

    #[error("photon direction has zero length")]
    ZeroDirection,
}

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("{name} must be non-negative (got {value})")]
    NegativeRadius { name: &'static str, value: f32 },

    #[error("speed must be positive and finite (got {0})")]
    NonPositiveSpeed(f32),

    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Misuse of a running simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("simulation has already terminated")]
    Terminated,
}
