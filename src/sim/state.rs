//! Game state and core simulation types
//!
//! Everything the simulation needs to advance lives here; cosmetic state
//! (clouds, particles) is owned by the renderer instead.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Bird hovering at the start position, waiting for the first flap
    Ready,
    /// Active gameplay
    Playing,
    /// Gameplay frozen while the tab is hidden
    Paused,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Whether physics advances in this phase
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// The player's bird. `x` is fixed for the whole run; pipes scroll instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            velocity: 0.0,
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
        }
    }
}

impl Bird {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A pipe pair with a gap between `gap_top` and `gap_bottom`
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    /// Height of the top pipe (y where the gap starts)
    pub gap_top: f32,
    /// y where the bottom pipe starts
    pub gap_bottom: f32,
    pub width: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Pipe {
    pub fn new(id: u32, x: f32, gap_top: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            gap_bottom: gap_top + PIPE_GAP,
            width: PIPE_WIDTH,
            passed: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Horizontal extent as a full-height rect (used for overlap tests)
    pub fn column(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, PLAY_HEIGHT)
    }
}

/// Something the simulation or controller wants observers to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ready -> Playing
    Started,
    /// Flap impulse applied
    Jumped,
    /// One or more pipes passed this tick; `score` is the new total
    Scored { score: u32 },
    /// Collision ended the run
    Crashed { score: u32, new_high_score: bool },
    /// Back to Ready
    Reset,
    Paused,
    Resumed,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub bird: Bird,
    /// Active pipes, oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    pub score: u32,
    /// Ticks simulated while Playing, drives the spawn cadence
    pub frame_count: u64,
    /// Gameplay RNG; only the obstacle generator draws from it
    pub rng: Pcg32,
    /// Next pipe ID (never reset, so IDs are unique across restarts)
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Ready,
            bird: Bird::default(),
            pipes: Vec::new(),
            score: 0,
            frame_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Allocate a new pipe ID
    pub fn next_pipe_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Return the run to its initial Ready state.
    ///
    /// Keeps the ID counter and RNG stream running so pipes from the next run
    /// never share IDs with the previous one.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Ready;
        self.bird = Bird::default();
        self.pipes.clear();
        self.score = 0;
        self.frame_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_ready() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.bird.x, BIRD_X);
        assert_eq!(state.bird.y, BIRD_START_Y);
        assert!(state.pipes.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pipe_gap_is_constant() {
        let pipe = Pipe::new(0, 400.0, 120.0);
        assert_eq!(pipe.gap_bottom - pipe.gap_top, PIPE_GAP);
        assert_eq!(pipe.right(), 460.0);
    }

    #[test]
    fn test_pipe_ids_survive_reset() {
        let mut state = GameState::new(7);
        let a = state.next_pipe_id();
        state.reset();
        let b = state.next_pipe_id();
        assert!(b > a);
    }
}
