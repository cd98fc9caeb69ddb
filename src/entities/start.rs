//! Starting position
//!
//! One-time vehicle placement at run start. No mesh is spawned; the backend
//! is told to teleport the vehicle to the resolved pose, lifted by a
//! configured vertical offset because the ground ray tends to sink the
//! vehicle slightly into the surface.

use rand::Rng;

use crate::client::{Pose, SimClient};
use crate::error::SpawnError;
use crate::geom::Polygon;
use crate::spawn::{resolve_spawn_pose, SpawnSpec};

#[derive(Debug, Clone)]
pub struct StartingPosition {
    spawn: SpawnSpec,
    z_offset: f32,
    pub spawn_pose: Option<Pose>,
}

impl StartingPosition {
    pub fn new(spawn: SpawnSpec, z_offset: f32) -> Self {
        Self {
            spawn,
            z_offset,
            spawn_pose: None,
        }
    }

    /// Resolve the pose, apply the vertical offset, and place the vehicle.
    pub fn spawn(
        &mut self,
        client: &mut dyn SimClient,
        rng: &mut impl Rng,
    ) -> Result<(), SpawnError> {
        let mut pose = resolve_spawn_pose(&self.spawn, client, rng, false, "starting position")?;
        pose.position.z += self.z_offset;
        self.spawn_pose = Some(pose);
        client.set_vehicle_pose(pose);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.spawn_pose = None;
    }

    pub fn spawn_region(&self) -> Option<&Polygon> {
        self.spawn.region()
    }
}
