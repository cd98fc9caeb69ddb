//! Run configuration document
//!
//! JSON with camelCase keys, matching the wire format existing course files
//! use. Required fields are checked by name so a missing key fails with a
//! message naming it; semantic rules (mutually exclusive spawn specs,
//! degenerate polygons, unknown styles) fail here too. Nothing is validated
//! lazily: a `RallyConfig` that loads is safe to run.

use glam::Vec2;
use serde::Deserialize;

use crate::consts::{CONE_MESH_BRIGHT, CONE_MESH_NORMAL};
use crate::error::ConfigError;
use crate::geom::Polygon;
use crate::spawn::{CandidatePose, SpawnSpec};

/// Visual style of a cone waypoint mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeStyle {
    Normal,
    Bright,
}

impl ConeStyle {
    /// Backend asset path for this style.
    pub fn mesh_path(self) -> &'static str {
        match self {
            ConeStyle::Normal => CONE_MESH_NORMAL,
            ConeStyle::Bright => CONE_MESH_BRIGHT,
        }
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "normal" => Ok(ConeStyle::Normal),
            "bright" => Ok(ConeStyle::Bright),
            _ => Err(ConfigError::UnknownConeStyle(raw.to_string())),
        }
    }
}

/// Optional visual marker on the goal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    None,
    Normal,
    Bright,
}

impl MarkerStyle {
    pub fn mesh_path(self) -> Option<&'static str> {
        match self {
            MarkerStyle::None => None,
            MarkerStyle::Normal => Some(CONE_MESH_NORMAL),
            MarkerStyle::Bright => Some(CONE_MESH_BRIGHT),
        }
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "none" => Ok(MarkerStyle::None),
            "normal" => Ok(MarkerStyle::Normal),
            "bright" => Ok(MarkerStyle::Bright),
            _ => Err(ConfigError::UnknownMarkerStyle(raw.to_string())),
        }
    }
}

/// Validated cone waypoint configuration.
#[derive(Debug, Clone)]
pub struct ConeConfig {
    pub bonus_multiplier: f64,
    pub style: ConeStyle,
    pub spawn: SpawnSpec,
}

/// Validated goal waypoint configuration. Tolerances are linear here; the
/// goal entity squares them once at construction.
#[derive(Debug, Clone)]
pub struct GoalConfig {
    pub position_tolerance: f32,
    pub velocity_tolerance: f32,
    pub marker: MarkerStyle,
    pub spawn: SpawnSpec,
}

/// Full, validated run configuration.
#[derive(Debug, Clone)]
pub struct RallyConfig {
    pub arena_bounds: Polygon,
    pub start: SpawnSpec,
    pub goal: GoalConfig,
    pub cones: Vec<ConeConfig>,
    /// Time limit in seconds.
    pub time_limit: f32,
    pub debug_print_status: bool,
    pub debug_draw: bool,
    pub end_run_on_collision: bool,
    /// Vertical correction applied to the start pose; the ground ray tends
    /// to place the vehicle slightly into the mesh.
    pub z_offset: f32,
}

impl RallyConfig {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        raw.validate()
    }
}

// ---------------------------------------------------------------------------
// Raw document (everything optional so presence can be checked by name)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    arena_bounds: Option<Vec<RawVertex>>,
    start_pose: Option<RawSpawnable>,
    goal_point: Option<RawGoal>,
    cones: Option<Vec<RawCone>>,
    time_limit: Option<f32>,
    debug_print_status: Option<bool>,
    debug_draw: Option<bool>,
    end_run_on_collision: Option<bool>,
    z_offset: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RawVertex {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct RawPose {
    x: f32,
    y: f32,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    roll: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpawnable {
    pose_list: Option<Vec<RawPose>>,
    spawn_region: Option<Vec<RawVertex>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGoal {
    #[serde(flatten)]
    spawn: RawSpawnable,
    position_tolerance: Option<f32>,
    velocity_tolerance: Option<f32>,
    cone_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCone {
    #[serde(flatten)]
    spawn: RawSpawnable,
    bonus_multiplier: Option<f64>,
    cone_type: Option<String>,
}

impl RawDocument {
    fn validate(self) -> Result<RallyConfig, ConfigError> {
        let arena_vertices = self
            .arena_bounds
            .ok_or(ConfigError::MissingField("arenaBounds"))?;
        let arena_bounds = polygon_from(arena_vertices, "arenaBounds")?;

        let start = self
            .start_pose
            .ok_or(ConfigError::MissingField("startPose"))?
            .validate("startPose")?;

        let goal = self
            .goal_point
            .ok_or(ConfigError::MissingField("goalPoint"))?
            .validate()?;

        let cones = self
            .cones
            .ok_or(ConfigError::MissingField("cones"))?
            .into_iter()
            .map(RawCone::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let time_limit = self.time_limit.ok_or(ConfigError::MissingField("timeLimit"))?;
        if time_limit <= 0.0 {
            return Err(ConfigError::NonPositive("timeLimit"));
        }

        Ok(RallyConfig {
            arena_bounds,
            start,
            goal,
            cones,
            time_limit,
            debug_print_status: self.debug_print_status.unwrap_or(false),
            debug_draw: self.debug_draw.unwrap_or(false),
            end_run_on_collision: self.end_run_on_collision.unwrap_or(false),
            z_offset: self.z_offset.unwrap_or(0.0),
        })
    }
}

impl RawSpawnable {
    fn validate(self, owner: &'static str) -> Result<SpawnSpec, ConfigError> {
        match (self.pose_list, self.spawn_region) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingSpawnSpec(owner)),
            (None, None) => Err(ConfigError::MissingSpawnSpec(owner)),
            (Some(poses), None) => {
                if poses.is_empty() {
                    return Err(ConfigError::EmptyPoseList(owner));
                }
                Ok(SpawnSpec::PoseList(
                    poses
                        .into_iter()
                        .map(|p| CandidatePose {
                            x: p.x,
                            y: p.y,
                            yaw: p.yaw,
                            pitch: p.pitch,
                            roll: p.roll,
                        })
                        .collect(),
                ))
            }
            (None, Some(vertices)) => Ok(SpawnSpec::Region(polygon_from(vertices, owner)?)),
        }
    }
}

impl RawGoal {
    fn validate(self) -> Result<GoalConfig, ConfigError> {
        let position_tolerance = self
            .position_tolerance
            .ok_or(ConfigError::MissingField("positionTolerance"))?;
        let velocity_tolerance = self
            .velocity_tolerance
            .ok_or(ConfigError::MissingField("velocityTolerance"))?;
        let marker = MarkerStyle::parse(
            &self.cone_type.ok_or(ConfigError::MissingField("coneType"))?,
        )?;
        Ok(GoalConfig {
            position_tolerance,
            velocity_tolerance,
            marker,
            spawn: self.spawn.validate("goalPoint")?,
        })
    }
}

impl RawCone {
    fn validate(self) -> Result<ConeConfig, ConfigError> {
        let bonus_multiplier = self
            .bonus_multiplier
            .ok_or(ConfigError::MissingField("bonusMultiplier"))?;
        if bonus_multiplier <= 0.0 {
            return Err(ConfigError::NonPositive("bonusMultiplier"));
        }
        let style =
            ConeStyle::parse(&self.cone_type.ok_or(ConfigError::MissingField("coneType"))?)?;
        Ok(ConeConfig {
            bonus_multiplier,
            style,
            spawn: self.spawn.validate("cone")?,
        })
    }
}

fn polygon_from(vertices: Vec<RawVertex>, owner: &'static str) -> Result<Polygon, ConfigError> {
    let polygon = Polygon::new(vertices.into_iter().map(|v| Vec2::new(v.x, v.y)).collect());
    if polygon.vertices().len() < 3 || polygon.area() <= 0.0 {
        return Err(ConfigError::DegeneratePolygon(owner));
    }
    Ok(polygon)
}
