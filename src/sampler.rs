//! Point sampling and ground resolution
//!
//! Turning a declarative spawn spec into world coordinates needs two
//! primitives: uniform sampling inside a polygon, and a downward ray query
//! that converts an (x, y) into a ground height and surface normal. Both are
//! pure functions over an explicit RNG and client so they stay deterministic
//! and testable.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::client::SimClient;
use crate::consts::{RAY_CAST_Z, RAY_ORIGIN_Z};
use crate::geom::Polygon;

/// Uniform rejection sampling within a polygon.
///
/// Samples the bounding box and discards points outside the polygon until one
/// is accepted. Configuration validation guarantees positive area, so the
/// acceptance probability is bounded away from zero and the loop terminates.
pub fn sample_in_region(polygon: &Polygon, rng: &mut impl Rng) -> Vec2 {
    let (min, max) = polygon.bounds();
    loop {
        let x = min.x + (max.x - min.x) * rng.random::<f32>();
        let y = min.y + (max.y - min.y) * rng.random::<f32>();
        let point = Vec2::new(x, y);
        if polygon.contains(point) {
            return point;
        }
    }
}

/// Resolve the ground height and surface normal under (x, y).
///
/// Casts one downward ray from high altitude and scans the hits in order.
/// A hit labeled `water` rejects the point outright, whatever follows; the
/// first `landscape` or `ground` hit wins; no qualifying hit means no ground.
/// Callers retry sampling on `None`.
pub fn resolve_ground(client: &mut dyn SimClient, x: f32, y: f32) -> Option<(f32, Vec3)> {
    let origin = Vec3::new(x, y, RAY_ORIGIN_Z);
    let direction = Vec3::new(0.0, 0.0, RAY_CAST_Z);

    for hit in client.cast_ray(origin, direction) {
        let label = hit.actor_name.to_lowercase();
        if label.contains("water") {
            return None;
        }
        if label.contains("landscape") || label.contains("ground") {
            return Some((hit.hit_point.z, hit.hit_normal));
        }
    }

    None
}
