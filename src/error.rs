//! Error types for configuration loading and spawn resolution
//!
//! Configuration problems are fatal at load time: there is no partially
//! constructed orchestrator. Spawn resolution can fail only when the
//! attempt budget is exhausted; a rejected sample point is retried, never
//! surfaced.

use thiserror::Error;

/// Fatal problems detected while loading the run configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level or nested field is absent.
    #[error("\"{0}\" not specified")]
    MissingField(&'static str),

    #[error("unrecognized cone style {0:?}; valid options are \"normal\" and \"bright\"")]
    UnknownConeStyle(String),

    #[error(
        "unrecognized goal marker style {0:?}; valid options are \"none\", \"normal\" and \"bright\""
    )]
    UnknownMarkerStyle(String),

    /// Exactly one of `poseList` / `spawnRegion` must be present.
    #[error("either \"poseList\" or \"spawnRegion\" must be specified for {0}")]
    MissingSpawnSpec(&'static str),

    #[error("\"poseList\" and \"spawnRegion\" cannot both be specified for {0}")]
    ConflictingSpawnSpec(&'static str),

    #[error("\"poseList\" for {0} is empty")]
    EmptyPoseList(&'static str),

    /// Fewer than 3 vertices, or zero area: rejection sampling over such a
    /// polygon would never terminate.
    #[error("polygon for {0} must have at least 3 vertices and positive area")]
    DegeneratePolygon(&'static str),

    #[error("\"{0}\" must be positive")]
    NonPositive(&'static str),
}

/// Spawn-pose resolution failure.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// Every sampled candidate was rejected by ground resolution (water or
    /// no ground surface) within the attempt budget.
    #[error("no valid spawn point found for {entity} after {attempts} attempts")]
    UnsatisfiableSpawn { entity: &'static str, attempts: u32 },
}
