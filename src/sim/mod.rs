//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, check_collision, find_collision, hits_boundary, hits_pipe};
pub use obstacles::{advance_pipes, spawn_pipe};
pub use physics::{apply_jump, step_bird, tilt_degrees};
pub use scoring::mark_passed;
pub use state::{Bird, GameEvent, GamePhase, GameState, Pipe};
pub use tick::{TickOutcome, tick};
