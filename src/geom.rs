//! Planar polygons and orientation conversions
//!
//! The arena and spawn regions are simple polygons in world (x, y). The
//! backend consumes orientations as quaternions; candidate poses are
//! configured as yaw/pitch/roll and ground alignment arrives as a surface
//! normal, so both conversions live here.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// An immutable simple polygon in world (x, y).
///
/// Vertices are ordered (either winding) and the closing edge from the last
/// vertex back to the first is implicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Axis-aligned bounding box as (min, max) corners.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        (min, max)
    }

    /// Unsigned area via the shoelace formula.
    pub fn area(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice_area += a.x * b.y - b.x * a.y;
        }
        twice_area.abs() / 2.0
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, point: Vec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Edges as (start, end) pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Convert yaw/pitch/roll (radians) to a unit quaternion.
///
/// Half-angle composition in yaw∘pitch∘roll order, with the x and y
/// components sign-inverted. The inversion is a fixed coordinate-frame
/// convention required by the consuming backend and must not be "fixed".
pub fn quat_from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Quat {
    let (sy, cy) = (yaw * 0.5).sin_cos();
    let (sp, cp) = (pitch * 0.5).sin_cos();
    let (sr, cr) = (roll * 0.5).sin_cos();

    let w = cy * cp * cr + sy * sp * sr;
    let x = cy * cp * sr - sy * sp * cr;
    let y = sy * cp * sr + cy * sp * cr;
    let z = sy * cp * cr - cy * sp * sr;

    Quat::from_xyzw(-x, -y, z, w)
}

/// Orientation aligning the up axis (+Z) with a ground surface normal.
///
/// Degenerate normals fall back to identity.
pub fn quat_from_ground_normal(normal: Vec3) -> Quat {
    match normal.try_normalize() {
        Some(n) => Quat::from_rotation_arc(Vec3::Z, n),
        None => Quat::IDENTITY,
    }
}
