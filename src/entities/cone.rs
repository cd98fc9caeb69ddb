//! Cone waypoints
//!
//! A cone is a visit-only marker: brushing it never ends the run, it just
//! records a visit that multiplies the final score. Each cone gets a unique
//! world id so collision events can be matched back to it.

use rand::Rng;
use uuid::Uuid;

use crate::client::{Pose, SimClient};
use crate::config::{ConeConfig, ConeStyle};
use crate::error::SpawnError;
use crate::geom::Polygon;
use crate::spawn::{resolve_spawn_pose, SpawnSpec};

#[derive(Debug, Clone)]
pub struct ConeWaypoint {
    spawn: SpawnSpec,
    style: ConeStyle,
    pub bonus_multiplier: f64,
    /// Unique name the mesh is spawned under; collision events carry it back.
    pub world_id: String,
    pub spawn_pose: Option<Pose>,
    pub visited: bool,
    /// Elapsed whole seconds at the moment of the first visit.
    pub visited_time_stamp: Option<i64>,
}

impl ConeWaypoint {
    pub fn new(config: ConeConfig) -> Self {
        Self {
            spawn: config.spawn,
            style: config.style,
            bonus_multiplier: config.bonus_multiplier,
            world_id: Uuid::new_v4().to_string(),
            spawn_pose: None,
            visited: false,
            visited_time_stamp: None,
        }
    }

    /// Resolve a ground-aligned pose and place the visual mesh.
    pub fn spawn(
        &mut self,
        client: &mut dyn SimClient,
        rng: &mut impl Rng,
    ) -> Result<(), SpawnError> {
        let pose = resolve_spawn_pose(&self.spawn, client, rng, true, "cone")?;
        self.spawn_pose = Some(pose);
        client.spawn_static_mesh(self.style.mesh_path(), &self.world_id, pose);
        log::debug!(
            "cone {} spawned at <{:.2}, {:.2}, {:.2}>",
            self.world_id,
            pose.position.x,
            pose.position.y,
            pose.position.z
        );
        Ok(())
    }

    /// Remove the placed mesh and reset. Always resets, whether or not a
    /// mesh was actually placed.
    pub fn despawn(&mut self, client: &mut dyn SimClient) {
        client.delete_object(&self.world_id);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.visited = false;
        self.visited_time_stamp = None;
        self.spawn_pose = None;
    }

    /// Record the first visit. Callers check `visited` first; the visit
    /// timestamp is never overwritten within a run.
    pub fn set_visited(&mut self, elapsed_seconds: i64) {
        self.visited = true;
        self.visited_time_stamp = Some(elapsed_seconds);
    }

    pub fn spawn_region(&self) -> Option<&Polygon> {
        self.spawn.region()
    }
}
