//! Spawn-placement specification and resolution
//!
//! Every placeable entity (cone, goal, starting position) is configured as
//! either an explicit candidate pose list or a bounded region polygon, and
//! resolves to exactly one world pose at spawn time. The three entity kinds
//! share this one resolution routine instead of inheriting it.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::client::{Pose, SimClient};
use crate::consts::MAX_SPAWN_ATTEMPTS;
use crate::error::SpawnError;
use crate::geom::{quat_from_ground_normal, quat_from_yaw_pitch_roll, Polygon};
use crate::sampler::{resolve_ground, sample_in_region};

/// A configured candidate pose: world (x, y) plus orientation angles in
/// radians. Height is never configured; it always comes from the ground ray.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandidatePose {
    pub x: f32,
    pub y: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Where an entity may be placed: one of a finite candidate list, or anywhere
/// inside a region polygon. Config validation guarantees the list is
/// non-empty and the polygon non-degenerate.
#[derive(Debug, Clone)]
pub enum SpawnSpec {
    PoseList(Vec<CandidatePose>),
    Region(Polygon),
}

impl SpawnSpec {
    /// The region polygon, when region-configured. Used by debug drawing.
    pub fn region(&self) -> Option<&Polygon> {
        match self {
            SpawnSpec::Region(polygon) => Some(polygon),
            SpawnSpec::PoseList(_) => None,
        }
    }
}

/// Resolve a spawn spec to one world pose.
///
/// Pose-list specs pick a candidate uniformly (with replacement across
/// calls); region specs rejection-sample an (x, y). Either way the height
/// comes from ground resolution, and a rejected point (water, no ground) is
/// retried with a fresh sample. The retry budget is bounded: exhausting it
/// means the spec is unsatisfiable, reported as an error rather than a hang.
///
/// Orientation: region spawns always align with the ground normal; pose-list
/// spawns align only when `align_to_ground` is set, otherwise they use the
/// candidate's configured angles.
pub fn resolve_spawn_pose(
    spec: &SpawnSpec,
    client: &mut dyn SimClient,
    rng: &mut impl Rng,
    align_to_ground: bool,
    entity: &'static str,
) -> Result<Pose, SpawnError> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let (xy, configured) = match spec {
            SpawnSpec::PoseList(candidates) => {
                let candidate = &candidates[rng.random_range(0..candidates.len())];
                (Vec2::new(candidate.x, candidate.y), Some(candidate))
            }
            SpawnSpec::Region(polygon) => (sample_in_region(polygon, rng), None),
        };

        let Some((z, normal)) = resolve_ground(client, xy.x, xy.y) else {
            continue;
        };

        let orientation = match configured {
            Some(candidate) if !align_to_ground => {
                quat_from_yaw_pitch_roll(candidate.yaw, candidate.pitch, candidate.roll)
            }
            _ => quat_from_ground_normal(normal),
        };

        return Ok(Pose::new(Vec3::new(xy.x, xy.y, z), orientation));
    }

    Err(SpawnError::UnsatisfiableSpawn {
        entity,
        attempts: MAX_SPAWN_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeClient;
    use crate::client::RayHit;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn square(min: f32, max: f32) -> Polygon {
        Polygon::new(vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ])
    }

    #[test]
    fn test_pose_list_resolves_with_configured_orientation() {
        let mut client = FakeClient::with_flat_ground();
        client.ray_hits[0].hit_point.z = 1.25;
        let mut rng = Pcg32::seed_from_u64(1);

        let spec = SpawnSpec::PoseList(vec![CandidatePose {
            x: 3.0,
            y: -4.0,
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            roll: 0.0,
        }]);
        let pose = resolve_spawn_pose(&spec, &mut client, &mut rng, false, "test").unwrap();

        assert_eq!(pose.position, Vec3::new(3.0, -4.0, 1.25));
        let expected = quat_from_yaw_pitch_roll(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        assert!((pose.orientation.w - expected.w).abs() < 1e-6);
        assert!((pose.orientation.z - expected.z).abs() < 1e-6);
    }

    #[test]
    fn test_pose_list_ground_alignment_overrides_angles() {
        let tilted = Vec3::new(0.5, 0.0, 1.0).normalize();
        let mut client = FakeClient::default();
        client.ray_hits = vec![RayHit {
            actor_name: "Landscape_0".into(),
            hit_point: Vec3::ZERO,
            hit_normal: tilted,
        }];
        let mut rng = Pcg32::seed_from_u64(2);

        let spec = SpawnSpec::PoseList(vec![CandidatePose {
            x: 0.0,
            y: 0.0,
            yaw: 1.0,
            pitch: 0.0,
            roll: 0.0,
        }]);
        let pose = resolve_spawn_pose(&spec, &mut client, &mut rng, true, "test").unwrap();
        assert!((pose.orientation * Vec3::Z - tilted).length() < 1e-5);
    }

    #[test]
    fn test_region_spawn_lands_inside_region() {
        let mut client = FakeClient::with_flat_ground();
        let mut rng = Pcg32::seed_from_u64(3);
        let region = square(10.0, 20.0);
        let spec = SpawnSpec::Region(region.clone());

        for _ in 0..50 {
            let pose = resolve_spawn_pose(&spec, &mut client, &mut rng, true, "test").unwrap();
            assert!(region.contains(Vec2::new(pose.position.x, pose.position.y)));
        }
    }

    #[test]
    fn test_unsatisfiable_spawn_is_an_error_not_a_hang() {
        // All ground rays hit water: every candidate is rejected.
        let mut client = FakeClient::default();
        client.ray_hits = vec![RayHit {
            actor_name: "WaterBodyLake".into(),
            hit_point: Vec3::ZERO,
            hit_normal: Vec3::Z,
        }];
        let mut rng = Pcg32::seed_from_u64(4);

        let spec = SpawnSpec::Region(square(0.0, 1.0));
        let err = resolve_spawn_pose(&spec, &mut client, &mut rng, true, "cone").unwrap_err();
        let SpawnError::UnsatisfiableSpawn { entity, attempts } = err;
        assert_eq!(entity, "cone");
        assert_eq!(attempts, MAX_SPAWN_ATTEMPTS);
    }

    #[test]
    fn test_sampling_is_reproducible_per_seed() {
        let spec = SpawnSpec::Region(square(-5.0, 5.0));
        let mut poses = Vec::new();
        for _ in 0..2 {
            let mut client = FakeClient::with_flat_ground();
            let mut rng = Pcg32::seed_from_u64(99);
            poses.push(resolve_spawn_pose(&spec, &mut client, &mut rng, true, "test").unwrap());
        }
        assert_eq!(poses[0].position, poses[1].position);
    }
}
