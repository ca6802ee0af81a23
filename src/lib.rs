//! Sky Flap - a Flappy-Bird style arcade game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, scoring)
//! - `controller`: Ready/Playing/GameOver state machine and side effects
//! - `renderer`: Cosmetic scene state and the WebGPU SDF pipeline
//! - `platform`: Fixed-step clock and browser animation-frame loops
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `backend`: Leaderboard/auth HTTP client

pub mod audio;
pub mod backend;
pub mod controller;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::GameController;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// All distances are logical pixels in an 800x600 play area with the origin
/// at the top-left corner and y growing downward. Velocities are per tick.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per logical frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches etc.)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play area
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Bird defaults
    pub const BIRD_X: f32 = 100.0;
    pub const BIRD_START_Y: f32 = PLAY_HEIGHT / 2.0;
    pub const BIRD_WIDTH: f32 = 30.0;
    pub const BIRD_HEIGHT: f32 = 25.0;

    /// Downward acceleration added every tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity the bird is set to on a flap (negative is up)
    pub const JUMP_STRENGTH: f32 = -8.0;
    /// Drag multiplier applied while falling
    pub const AIR_DAMPING: f32 = 0.98;
    /// Maximum downward speed
    pub const TERMINAL_VELOCITY: f32 = 10.0;
    /// Cosmetic tilt, degrees per unit of velocity
    pub const TILT_PER_VELOCITY: f32 = 4.5;
    pub const MAX_TILT_DEGREES: f32 = 45.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SPEED: f32 = 3.0;
    /// Ticks between pipe spawns
    pub const PIPE_SPAWN_PERIOD: u64 = 120;
    /// Minimum distance from the gap to y = 0 and to y = PLAY_HEIGHT. Measured
    /// from the play-area edges, not the ground strip, so the gap bottom may
    /// sit right on top of the ground.
    pub const PIPE_EDGE_MARGIN: f32 = 50.0;
    /// Pipes are pruned once their right edge is this far past x = 0
    pub const PIPE_PRUNE_MARGIN: f32 = 100.0;
}

/// Axis-aligned rectangle in play-area coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict horizontal overlap (touching edges do not overlap)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}
