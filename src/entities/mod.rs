//! Placeable competition entities
//!
//! Cone waypoints (visit for a score multiplier), the goal waypoint (visit
//! to finish), and the starting position. Each holds its spawn spec by value
//! and resolves it through the shared routine in [`crate::spawn`].

pub mod cone;
pub mod goal;
pub mod start;

pub use cone::ConeWaypoint;
pub use goal::GoalWaypoint;
pub use start::StartingPosition;
