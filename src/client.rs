//! Simulation backend contract
//!
//! The competition runs inside an externally owned simulation. Everything the
//! judge needs from it is expressed through [`SimClient`]: pose and velocity
//! queries, collision events, ray casts, static-mesh placement, and debug
//! drawing. Backend calls are assumed to succeed; retry and backoff are the
//! caller's concern, not this crate's.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A world-space position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Latest collision event reported by the backend.
///
/// The backend keeps reporting the same event until a new collision happens;
/// consumers de-duplicate by `time_stamp`.
#[derive(Debug, Clone, Default)]
pub struct CollisionInfo {
    pub has_collided: bool,
    pub object_name: String,
    pub time_stamp: u64,
}

/// One ray-cast hit. Hits arrive ordered along the ray.
#[derive(Debug, Clone)]
pub struct RayHit {
    pub actor_name: String,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

/// Color with alpha, 0-255 per channel.
pub type Rgba = (u8, u8, u8, u8);

/// A single renderable debug primitive.
#[derive(Debug, Clone)]
pub enum DebugShape {
    Line {
        start: Vec3,
        end: Vec3,
        thickness: f32,
        color: Rgba,
    },
    Circle {
        center: Vec3,
        normal: Vec3,
        radius: f32,
        thickness: f32,
        segments: u32,
        color: Rgba,
    },
}

/// Batch of named debug shapes submitted in one call.
#[derive(Debug, Clone, Default)]
pub struct DrawRequest {
    pub shapes: Vec<(String, DebugShape)>,
    /// When false, shapes not named in this batch are cleared by the backend.
    pub persist_unmentioned: bool,
}

impl DrawRequest {
    pub fn push(&mut self, name: String, shape: DebugShape) {
        self.shapes.push((name, shape));
    }
}

/// The simulation backend as consumed by the orchestrator.
pub trait SimClient {
    /// Current vehicle pose.
    fn vehicle_pose(&mut self) -> Pose;

    /// Current vehicle linear velocity.
    fn vehicle_velocity(&mut self) -> Vec3;

    /// Latest collision event.
    fn collision_info(&mut self) -> CollisionInfo;

    /// Cast a ray and return the ordered hit list.
    fn cast_ray(&mut self, origin: Vec3, direction: Vec3) -> Vec<RayHit>;

    /// Place a named static visual mesh at a pose.
    fn spawn_static_mesh(&mut self, mesh_path: &str, object_name: &str, pose: Pose);

    /// Remove a previously spawned object.
    fn delete_object(&mut self, object_name: &str);

    /// Stamp a semantic-segmentation id onto a named object.
    fn set_segmentation_id(&mut self, object_name: &str, id: u32);

    /// Teleport the vehicle.
    fn set_vehicle_pose(&mut self, pose: Pose);

    /// Submit a batch of debug primitives for rendering.
    fn set_drawable_shapes(&mut self, request: DrawRequest);
}
