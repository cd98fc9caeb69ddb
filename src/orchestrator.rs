//! Run orchestration state machine
//!
//! Owns the full competition lifecycle: spawning every entity at run start,
//! per-tick evaluation of the termination conditions, scoring, the
//! human-readable summary, and teardown. The caller actuates the vehicle
//! between ticks and passes wall-clock time in explicitly, which keeps the
//! whole state machine deterministic under test.
//!
//! Tick evaluation order is a compatibility surface: time limit (early
//! return), arena bounds (falls through), collision, goal arrival. A
//! same-tick collision or goal arrival may therefore overwrite an
//! out-of-bounds termination, but never a time-limit one.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::client::{DrawRequest, SimClient};
use crate::config::RallyConfig;
use crate::debug_draw;
use crate::entities::{ConeWaypoint, GoalWaypoint, StartingPosition};
use crate::error::SpawnError;
use crate::geom::Polygon;

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEndReason {
    TimeLimitExceeded,
    OutOfBounds,
    /// Collision with an object that is not a registered cone.
    Collision(String),
    GoalReached,
}

impl fmt::Display for RunEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEndReason::TimeLimitExceeded => write!(f, "time limit exceeded."),
            RunEndReason::OutOfBounds => write!(f, "out of bounds."),
            RunEndReason::Collision(object) => write!(f, "collision with {object}."),
            RunEndReason::GoalReached => write!(f, "goal reached."),
        }
    }
}

/// Lifecycle phase of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Running,
    Complete,
}

/// Mutable per-run state, created fresh by every `start_new_run`.
#[derive(Debug, Clone)]
struct RunState {
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    deadline: DateTime<Utc>,
    elapsed_seconds: i64,
    complete: bool,
    end_reason: Option<RunEndReason>,
    /// Timestamp of the last collision event processed; each timestamp is
    /// handled at most once.
    last_collision_time_stamp: Option<u64>,
}

/// Per-cone slice of a [`RunSummary`].
#[derive(Debug, Clone)]
pub struct ConeStatus {
    pub id: String,
    pub position: Vec3,
    pub visited: bool,
    pub visited_time_stamp: Option<i64>,
    pub bonus_multiplier: f64,
}

/// Goal slice of a [`RunSummary`].
#[derive(Debug, Clone)]
pub struct GoalStatus {
    pub position: Vec3,
    pub visited: bool,
    pub visited_time_stamp: Option<i64>,
    /// Closest approach over the run, as a linear distance.
    pub closest_distance: f32,
}

/// Snapshot of one run, for polling and reporting.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_complete: bool,
    pub run_start_time: DateTime<Utc>,
    pub run_end_time: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub score: f64,
    pub run_end_reason: Option<RunEndReason>,
    pub cones: Vec<ConeStatus>,
    pub goal: GoalStatus,
}

/// The competition judge. Owns every entity for the lifetime of a run.
pub struct RallyOrchestrator {
    arena_bounds: Polygon,
    start_pose: StartingPosition,
    goal: GoalWaypoint,
    cones: Vec<ConeWaypoint>,
    time_limit: Duration,
    debug_print_status: bool,
    debug_draw: bool,
    end_run_on_collision: bool,
    rng: Pcg32,
    run: Option<RunState>,
}

impl RallyOrchestrator {
    /// Build from a validated configuration and an explicit sampling seed.
    pub fn new(config: RallyConfig, seed: u64) -> Self {
        Self {
            arena_bounds: config.arena_bounds,
            start_pose: StartingPosition::new(config.start, config.z_offset),
            goal: GoalWaypoint::new(config.goal),
            cones: config.cones.into_iter().map(ConeWaypoint::new).collect(),
            time_limit: Duration::milliseconds((config.time_limit * 1000.0) as i64),
            debug_print_status: config.debug_print_status,
            debug_draw: config.debug_draw,
            end_run_on_collision: config.end_run_on_collision,
            rng: Pcg32::seed_from_u64(seed),
            run: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        match &self.run {
            None => RunPhase::NotStarted,
            Some(run) if run.complete => RunPhase::Complete,
            Some(_) => RunPhase::Running,
        }
    }

    pub fn set_debug_draw_enabled(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }

    pub fn cones(&self) -> &[ConeWaypoint] {
        &self.cones
    }

    pub fn goal(&self) -> &GoalWaypoint {
        &self.goal
    }

    /// Reset and spawn every entity, then arm the clock.
    ///
    /// Goal and cones are placed before the vehicle so the debug batch can
    /// be derived from their resolved poses. Prior entities, if any, are
    /// assumed already torn down by the caller.
    pub fn start_new_run(
        &mut self,
        client: &mut dyn SimClient,
        now: DateTime<Utc>,
    ) -> Result<(), SpawnError> {
        self.goal.reset();
        self.goal.spawn(client, &mut self.rng)?;

        for cone in &mut self.cones {
            cone.reset();
            cone.spawn(client, &mut self.rng)?;
        }

        self.start_pose.spawn(client, &mut self.rng)?;

        let request = if self.debug_draw {
            debug_draw::build_debug_shapes(
                client,
                &self.arena_bounds,
                &self.cones,
                &self.goal,
                &self.start_pose,
            )
        } else {
            DrawRequest::default()
        };
        client.set_drawable_shapes(request);

        self.run = Some(RunState {
            start_time: now,
            end_time: None,
            deadline: now + self.time_limit,
            elapsed_seconds: 0,
            complete: false,
            end_reason: None,
            last_collision_time_stamp: None,
        });

        log::info!(
            "run started at {now}; time limit {}s, {} cone(s)",
            self.time_limit.num_seconds(),
            self.cones.len()
        );
        Ok(())
    }

    /// Evaluate one tick. No-op once the run is complete.
    pub fn tick(&mut self, client: &mut dyn SimClient, now: DateTime<Utc>) {
        if self.debug_print_status && self.phase() == RunPhase::Running {
            if let Some(text) = self.summary_text(now) {
                log::debug!("{text}");
            }
        }

        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.end_time.is_some() || run.complete {
            return;
        }

        run.elapsed_seconds = (now - run.start_time).num_seconds();

        if now > run.deadline {
            run.end_time = Some(now);
            run.complete = true;
            run.end_reason = Some(RunEndReason::TimeLimitExceeded);
            log::info!("run ended: time limit exceeded");
            return;
        }

        let pose = client.vehicle_pose();
        if !self
            .arena_bounds
            .contains(Vec2::new(pose.position.x, pose.position.y))
        {
            run.end_time = Some(now);
            run.complete = true;
            run.end_reason = Some(RunEndReason::OutOfBounds);
            log::info!("run ended: vehicle left the arena");
            // No early return: the collision and goal checks below still run
            // this tick and may overwrite the reason.
        }

        let collision = client.collision_info();
        if collision.has_collided && run.last_collision_time_stamp != Some(collision.time_stamp) {
            run.last_collision_time_stamp = Some(collision.time_stamp);

            let mut collided_with_cone = false;
            for cone in &mut self.cones {
                if cone.world_id == collision.object_name {
                    if !cone.visited {
                        cone.set_visited(run.elapsed_seconds);
                        log::info!(
                            "cone {} visited at {}s",
                            cone.world_id,
                            run.elapsed_seconds
                        );
                    }
                    collided_with_cone = true;
                }
            }

            if !collided_with_cone && self.end_run_on_collision {
                run.end_time = Some(now);
                run.complete = true;
                run.end_reason = Some(RunEndReason::Collision(collision.object_name.clone()));
                log::info!("run ended: collision with {}", collision.object_name);
                return;
            }
        }

        let velocity = client.vehicle_velocity();
        if self.goal.is_at_goal(pose.position, velocity) && !self.goal.visited {
            self.goal.set_visited(run.elapsed_seconds);
            run.end_time = Some(now);
            run.complete = true;
            run.end_reason = Some(RunEndReason::GoalReached);
            log::info!("run ended: goal reached at {}s", run.elapsed_seconds);
        }
    }

    /// The run score: elapsed whole seconds multiplied by every visited
    /// cone's bonus, in entity order. Zero for any run that is not complete
    /// or did not visit the goal.
    pub fn score(&self) -> f64 {
        let Some(run) = &self.run else {
            return 0.0;
        };
        let Some(end_time) = run.end_time else {
            return 0.0;
        };
        if !run.complete || !self.goal.visited {
            return 0.0;
        }

        let mut score = (end_time - run.start_time).num_seconds() as f64;
        for cone in &self.cones {
            if cone.visited {
                score *= cone.bonus_multiplier;
            }
        }
        score
    }

    /// Snapshot of the current run, or `None` before the first start.
    pub fn summary(&self, now: DateTime<Utc>) -> Option<RunSummary> {
        let run = self.run.as_ref()?;

        let cones = self
            .cones
            .iter()
            .map(|cone| ConeStatus {
                id: cone.world_id.clone(),
                position: cone.spawn_pose.map_or(Vec3::ZERO, |p| p.position),
                visited: cone.visited,
                visited_time_stamp: cone.visited_time_stamp,
                bonus_multiplier: cone.bonus_multiplier,
            })
            .collect();

        Some(RunSummary {
            run_complete: run.complete,
            run_start_time: run.start_time,
            run_end_time: run.end_time,
            now,
            elapsed_seconds: (now - run.start_time).num_seconds(),
            score: self.score(),
            run_end_reason: run.end_reason.clone(),
            cones,
            goal: GoalStatus {
                position: self.goal.spawn_pose.map_or(Vec3::ZERO, |p| p.position),
                visited: self.goal.visited,
                visited_time_stamp: self.goal.visited_time_stamp,
                closest_distance: self.goal.closest_distance(),
            },
        })
    }

    /// Fixed multi-line report. Field order and labels are parsed by
    /// external tooling; change nothing here without changing that tooling.
    pub fn summary_text(&self, now: DateTime<Utc>) -> Option<String> {
        let summary = self.summary(now)?;

        let mut text = String::from("==============================================\n");
        text += "Summary \n";
        text += &format!("Current time: {}.\n", summary.now);
        text += &format!("RunStartTime: {}.\n", summary.run_start_time);
        text += &format!("Elapsed time: {} seconds.\n", summary.elapsed_seconds);

        match (summary.run_complete, summary.run_end_time, &summary.run_end_reason) {
            (true, Some(end_time), Some(reason)) => {
                text += &format!(
                    "RunEndTime: {}.\n Score: {:.4}\nRun End Reason: {}",
                    end_time, summary.score, reason
                );
            }
            _ => {
                text += "The run is still ongoing. Score cannot be computed.\n";
            }
        }

        text += "\n";
        text += "Cone Statuses:\n";
        for cone in &summary.cones {
            text += &format!("\tCone name: {}.\n", cone.id);
            text += &format!(
                "\t\tCone position: <{:.2}, {:.2}, {:.2}>.\n",
                cone.position.x, cone.position.y, cone.position.z
            );
            text += &format!("\t\tCone multiplier: {}.\n", cone.bonus_multiplier);
            match cone.visited_time_stamp {
                Some(t) if cone.visited => {
                    text += &format!("\t\tCone was visited at time: {:.1}.\n", t as f64);
                }
                _ => {
                    text += "\t\tCone has not been visited.";
                }
            }
            text += "\n";
        }

        text += "Goal Status:\n";
        text += &format!(
            "\tGoal position: <{:.2}, {:.2}, {:.2}>\n",
            summary.goal.position.x, summary.goal.position.y, summary.goal.position.z
        );
        match summary.goal.visited_time_stamp {
            Some(t) if summary.goal.visited => {
                text += &format!("\tGoal was visited at time {:.1}.\n", t as f64);
            }
            _ => {
                text += &format!(
                    "\tGoal has not been visited. The closest distance achieved during the run was {:.3} m.\n",
                    summary.goal.closest_distance
                );
            }
        }
        text += "==============================================\n";

        Some(text)
    }

    /// Remove every spawned entity from the world.
    pub fn cleanup(&mut self, client: &mut dyn SimClient) {
        for cone in &mut self.cones {
            cone.despawn(client);
        }
        self.goal.despawn(client);
    }
}
