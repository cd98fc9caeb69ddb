//! Waypoint Rally - a timed robot navigation competition judge
//!
//! Core modules:
//! - `orchestrator`: Run lifecycle state machine (spawn, tick, score, teardown)
//! - `entities`: Cone waypoints, the goal, and the starting position
//! - `spawn` / `sampler`: Pose resolution from pose lists and spawn regions
//! - `config`: JSON competition configuration with validation
//! - `client`: Simulation backend abstraction (poses, rays, meshes, drawing)
//! - `debug_draw`: Operator visualization derived from resolved poses
//! - `geom`: Polygon tests and the orientation conventions of the backend

pub mod client;
pub mod config;
pub mod debug_draw;
pub mod entities;
pub mod error;
pub mod geom;
pub mod orchestrator;
pub mod sampler;
pub mod spawn;

pub use config::RallyConfig;
pub use error::{ConfigError, SpawnError};
pub use orchestrator::{RallyOrchestrator, RunPhase, RunSummary};

/// Judge configuration constants
pub mod consts {
    /// Ground rays are cast straight down from well above any terrain.
    pub const RAY_ORIGIN_Z: f32 = 10_000.0;
    /// Downward ray extent, long enough to pass below any terrain.
    pub const RAY_CAST_Z: f32 = -20_000.0;

    /// Segmentation id stamped on the goal marker for perception tooling.
    pub const GOAL_SEGMENTATION_ID: u32 = 235;

    /// Upper bound on rejection-sampling attempts before a spawn is
    /// declared unsatisfiable.
    pub const MAX_SPAWN_ATTEMPTS: u32 = 1_000;

    /// Cone mesh asset paths
    pub const CONE_MESH_NORMAL: &str =
        "StaticMesh'/Game/DT_Spring_Landscape/Meshes/SM_traffic_cone.SM_traffic_cone'";
    pub const CONE_MESH_BRIGHT: &str =
        "StaticMesh'/Game/DT_Spring_Landscape/Meshes/SM_traffic_cone_bright.SM_traffic_cone_bright'";
}
