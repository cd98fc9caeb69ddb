//! Debug visualization
//!
//! Derives line and circle primitives from the arena and current entity
//! poses for operator feedback. Purely observational: nothing here feeds
//! back into scoring or run evaluation.

use glam::Vec3;
use uuid::Uuid;

use crate::client::{DebugShape, DrawRequest, Rgba, SimClient};
use crate::entities::{ConeWaypoint, GoalWaypoint, StartingPosition};
use crate::geom::Polygon;
use crate::sampler::resolve_ground;

const ALPHA: u8 = 100;
const THICKNESS: f32 = 10.0;
/// Vertical spacing between the stacked fence rails.
const FENCE_SPACING: f32 = 0.3;
const FENCE_RAILS: u32 = 3;
const CIRCLE_SEGMENTS: u32 = 64;

const ARENA_COLOR: Rgba = (0, 0, 255, ALPHA);
const CONE_MARKER_COLOR: Rgba = (0, 255, 0, ALPHA);
const CONE_REGION_COLOR: Rgba = (255, 255, 0, ALPHA);
const GOAL_CIRCLE_COLOR: Rgba = (255, 0, 0, ALPHA);
const GOAL_REGION_COLOR: Rgba = (255, 0, 255, ALPHA);
const START_CIRCLE_COLOR: Rgba = (0, 255, 255, ALPHA);
const START_REGION_COLOR: Rgba = (0, 0, 0, ALPHA);

/// Build the full debug batch for one run: arena fence, cone markers and
/// spawn regions, goal circle and region, start circle and region.
pub fn build_debug_shapes(
    client: &mut dyn SimClient,
    arena: &Polygon,
    cones: &[ConeWaypoint],
    goal: &GoalWaypoint,
    start: &StartingPosition,
) -> DrawRequest {
    let mut request = DrawRequest {
        shapes: Vec::new(),
        persist_unmentioned: false,
    };

    polygon_fence(&mut request, client, arena, ARENA_COLOR);

    for cone in cones {
        if let Some(pose) = cone.spawn_pose {
            let (x, y) = (pose.position.x, pose.position.y);
            let ground_z = ground_height(client, x, y);
            // Vertical marker line above the cone, visible from a distance
            push(
                &mut request,
                DebugShape::Line {
                    start: Vec3::new(x, y, ground_z + 0.4),
                    end: Vec3::new(x, y, 10.0),
                    thickness: THICKNESS,
                    color: CONE_MARKER_COLOR,
                },
            );
        }
        if let Some(region) = cone.spawn_region() {
            polygon_fence(&mut request, client, region, CONE_REGION_COLOR);
        }
    }

    if let Some(pose) = goal.spawn_pose {
        let (x, y) = (pose.position.x, pose.position.y);
        let (_, normal) = ground_surface(client, x, y);
        push(
            &mut request,
            DebugShape::Circle {
                center: Vec3::new(x, y, pose.position.z + 0.1),
                normal,
                radius: goal.arrival_radius(),
                thickness: THICKNESS,
                segments: CIRCLE_SEGMENTS,
                color: GOAL_CIRCLE_COLOR,
            },
        );
    }
    if let Some(region) = goal.spawn_region() {
        polygon_fence(&mut request, client, region, GOAL_REGION_COLOR);
    }

    if let Some(pose) = start.spawn_pose {
        let (x, y) = (pose.position.x, pose.position.y);
        let (_, normal) = ground_surface(client, x, y);
        push(
            &mut request,
            DebugShape::Circle {
                center: pose.position,
                normal,
                radius: 0.5,
                thickness: THICKNESS,
                segments: CIRCLE_SEGMENTS,
                color: START_CIRCLE_COLOR,
            },
        );
    }
    if let Some(region) = start.spawn_region() {
        polygon_fence(&mut request, client, region, START_REGION_COLOR);
    }

    request
}

/// Fence a polygon: per edge, a vertical post at the first vertex plus
/// stacked rails following the terrain between the two endpoints.
fn polygon_fence(request: &mut DrawRequest, client: &mut dyn SimClient, polygon: &Polygon, color: Rgba) {
    for (a, b) in polygon.edges() {
        let a_z = ground_height(client, a.x, a.y);
        let b_z = ground_height(client, b.x, b.y);

        push(
            request,
            DebugShape::Line {
                start: Vec3::new(a.x, a.y, a_z),
                end: Vec3::new(a.x, a.y, a_z + FENCE_SPACING * FENCE_RAILS as f32),
                thickness: THICKNESS,
                color,
            },
        );

        for rail in 1..=FENCE_RAILS {
            let lift = rail as f32 * FENCE_SPACING;
            push(
                request,
                DebugShape::Line {
                    start: Vec3::new(a.x, a.y, a_z + lift),
                    end: Vec3::new(b.x, b.y, b_z + lift),
                    thickness: THICKNESS,
                    color,
                },
            );
        }
    }
}

fn push(request: &mut DrawRequest, shape: DebugShape) {
    request.push(Uuid::new_v4().to_string(), shape);
}

fn ground_height(client: &mut dyn SimClient, x: f32, y: f32) -> f32 {
    ground_surface(client, x, y).0
}

fn ground_surface(client: &mut dyn SimClient, x: f32, y: f32) -> (f32, Vec3) {
    match resolve_ground(client, x, y) {
        Some(surface) => surface,
        None => {
            log::warn!("no ground under debug shape at ({x:.1}, {y:.1}); drawing at z = 0");
            (0.0, Vec3::Z)
        }
    }
}
