//! Goal waypoint
//!
//! The run objective. Arrival requires being within a position tolerance of
//! the goal center while nearly stationary; both tolerances are stored
//! pre-squared so the per-tick check never takes a square root.

use glam::Vec3;
use rand::Rng;
use uuid::Uuid;

use crate::client::{Pose, SimClient};
use crate::config::{GoalConfig, MarkerStyle};
use crate::consts::GOAL_SEGMENTATION_ID;
use crate::error::SpawnError;
use crate::geom::Polygon;
use crate::spawn::{resolve_spawn_pose, SpawnSpec};

#[derive(Debug, Clone)]
pub struct GoalWaypoint {
    spawn: SpawnSpec,
    marker: MarkerStyle,
    position_tolerance_sq: f32,
    velocity_tolerance_sq: f32,
    pub world_id: String,
    pub spawn_pose: Option<Pose>,
    /// Immutable once spawned; cleared only by reset.
    pub goal_center: Option<Vec3>,
    pub visited: bool,
    pub visited_time_stamp: Option<i64>,
    /// Running minimum squared distance to the goal, monotonically
    /// non-increasing across a run.
    pub closest_distance_sq: f32,
}

impl GoalWaypoint {
    pub fn new(config: GoalConfig) -> Self {
        Self {
            spawn: config.spawn,
            marker: config.marker,
            position_tolerance_sq: config.position_tolerance * config.position_tolerance,
            velocity_tolerance_sq: config.velocity_tolerance * config.velocity_tolerance,
            world_id: Uuid::new_v4().to_string(),
            spawn_pose: None,
            goal_center: None,
            visited: false,
            visited_time_stamp: None,
            closest_distance_sq: f32::INFINITY,
        }
    }

    /// Resolve the goal pose and, when a marker style is configured, place
    /// the marker mesh and stamp its segmentation id for perception tooling.
    pub fn spawn(
        &mut self,
        client: &mut dyn SimClient,
        rng: &mut impl Rng,
    ) -> Result<(), SpawnError> {
        let pose = resolve_spawn_pose(&self.spawn, client, rng, false, "goal")?;
        self.spawn_pose = Some(pose);
        self.goal_center = Some(pose.position);

        if let Some(mesh_path) = self.marker.mesh_path() {
            client.spawn_static_mesh(mesh_path, &self.world_id, pose);
            client.set_segmentation_id(&self.world_id, GOAL_SEGMENTATION_ID);
        }
        log::debug!(
            "goal spawned at <{:.2}, {:.2}, {:.2}>",
            pose.position.x,
            pose.position.y,
            pose.position.z
        );
        Ok(())
    }

    /// Whether the vehicle has arrived: within the position tolerance of the
    /// goal center and nearly stationary, both boundary inclusive.
    ///
    /// Always updates the running minimum distance, whatever the outcome.
    /// The velocity metric is `vx² + vy²·vz²` (the y and z terms multiply
    /// rather than add). Downstream tooling expects this exact metric, so it
    /// is pinned as-is.
    pub fn is_at_goal(&mut self, position: Vec3, velocity: Vec3) -> bool {
        let Some(center) = self.goal_center else {
            return false;
        };

        let distance_sq = position.distance_squared(center);
        let velocity_metric =
            velocity.x * velocity.x + velocity.y * velocity.y * (velocity.z * velocity.z);

        self.closest_distance_sq = self.closest_distance_sq.min(distance_sq);

        distance_sq <= self.position_tolerance_sq && velocity_metric <= self.velocity_tolerance_sq
    }

    pub fn set_visited(&mut self, elapsed_seconds: i64) {
        self.visited = true;
        self.visited_time_stamp = Some(elapsed_seconds);
    }

    /// Remove the marker mesh (only if one was configured), then reset.
    pub fn despawn(&mut self, client: &mut dyn SimClient) {
        if self.marker != MarkerStyle::None {
            client.delete_object(&self.world_id);
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.visited = false;
        self.visited_time_stamp = None;
        self.closest_distance_sq = f32::INFINITY;
        self.spawn_pose = None;
        self.goal_center = None;
    }

    /// Closest approach over the run as a linear distance.
    pub fn closest_distance(&self) -> f32 {
        self.closest_distance_sq.sqrt()
    }

    /// Linear arrival radius, for visualization.
    pub fn arrival_radius(&self) -> f32 {
        self.position_tolerance_sq.sqrt()
    }

    pub fn spawn_region(&self) -> Option<&Polygon> {
        self.spawn.region()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeClient;
    use crate::consts::CONE_MESH_NORMAL;
    use crate::spawn::CandidatePose;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn goal_config(marker: MarkerStyle) -> GoalConfig {
        GoalConfig {
            position_tolerance: 1.0,
            velocity_tolerance: 0.5,
            marker,
            spawn: SpawnSpec::PoseList(vec![CandidatePose {
                x: 0.0,
                y: 0.0,
                yaw: 0.0,
                pitch: 0.0,
                roll: 0.0,
            }]),
        }
    }

    fn spawned_goal(marker: MarkerStyle) -> (GoalWaypoint, FakeClient) {
        let mut client = FakeClient::with_flat_ground();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut goal = GoalWaypoint::new(goal_config(marker));
        goal.spawn(&mut client, &mut rng).unwrap();
        (goal, client)
    }

    #[test]
    fn test_not_at_goal_before_spawn() {
        let mut goal = GoalWaypoint::new(goal_config(MarkerStyle::None));
        assert!(!goal.is_at_goal(Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_arrival_is_boundary_inclusive() {
        let (mut goal, _) = spawned_goal(MarkerStyle::None);
        // Goal center is (0, 0, 0) on flat ground; distance exactly 1.0 with
        // zero velocity counts as arrived.
        assert!(goal.is_at_goal(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));
        assert!(!goal.is_at_goal(Vec3::new(1.001, 0.0, 0.0), Vec3::ZERO));
    }

    #[test]
    fn test_moving_vehicle_is_not_arrived() {
        let (mut goal, _) = spawned_goal(MarkerStyle::None);
        assert!(!goal.is_at_goal(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_velocity_metric_multiplies_y_and_z_terms() {
        // Not the standard squared norm: vy²·vz² vanishes whenever either
        // component is zero, so lateral-only motion passes the check.
        let (mut goal, _) = spawned_goal(MarkerStyle::None);
        assert!(goal.is_at_goal(Vec3::ZERO, Vec3::new(0.0, 100.0, 0.0)));
        assert!(!goal.is_at_goal(Vec3::ZERO, Vec3::new(0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_closest_distance_updates_on_every_check() {
        let (mut goal, _) = spawned_goal(MarkerStyle::None);
        assert!(goal.closest_distance_sq.is_infinite());

        goal.is_at_goal(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(goal.closest_distance(), 10.0);

        goal.is_at_goal(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(goal.closest_distance(), 4.0);

        // Moving away never increases the minimum
        goal.is_at_goal(Vec3::new(25.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(goal.closest_distance(), 4.0);
    }

    #[test]
    fn test_marker_mesh_and_segmentation_id() {
        let (goal, client) = spawned_goal(MarkerStyle::Normal);
        let (mesh, name, _) = &client.spawned[0];
        assert_eq!(mesh, CONE_MESH_NORMAL);
        assert_eq!(name, &goal.world_id);
        assert_eq!(
            client.segmentation_ids,
            vec![(goal.world_id.clone(), GOAL_SEGMENTATION_ID)]
        );
    }

    #[test]
    fn test_no_marker_spawns_no_mesh() {
        let (_, client) = spawned_goal(MarkerStyle::None);
        assert!(client.spawned.is_empty());
        assert!(client.segmentation_ids.is_empty());
    }

    #[test]
    fn test_despawn_deletes_marker_only_when_configured() {
        let (mut goal, mut client) = spawned_goal(MarkerStyle::Bright);
        goal.despawn(&mut client);
        assert_eq!(client.deleted, vec![goal.world_id.clone()]);

        let (mut goal, mut client) = spawned_goal(MarkerStyle::None);
        goal.despawn(&mut client);
        assert!(client.deleted.is_empty());
        assert!(goal.closest_distance_sq.is_infinite());
        assert!(goal.goal_center.is_none());
    }
}
