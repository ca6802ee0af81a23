//! Fixed timestep simulation tick
//!
//! Advances one Playing frame in a fixed order:
//! pipes (scroll/prune/spawn) -> bird physics -> scoring -> collision.
//! Scoring runs before collision so a pass and a crash on the same tick
//! still credits the point. The boundary check covers the bird both where
//! it entered the tick and where it ended it, so a bird resting on the
//! ceiling or ground crashes even if physics moves it back inside.

use super::collision::{CollisionKind, find_collision, hits_boundary};
use super::obstacles::advance_pipes;
use super::physics::step_bird;
use super::scoring::mark_passed;
use super::state::GameState;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Pipes newly passed (already added to `state.score`)
    pub passed: u32,
    pub collision: Option<CollisionKind>,
}

impl TickOutcome {
    pub fn crashed(&self) -> bool {
        self.collision.is_some()
    }
}

/// Advance the game state by one tick. No-op outside of Playing.
///
/// Phase transitions are left to the controller.
pub fn tick(state: &mut GameState) -> TickOutcome {
    if !state.phase.is_running() {
        return TickOutcome::default();
    }

    advance_pipes(state);
    let entry = hits_boundary(&state.bird.rect());
    step_bird(&mut state.bird);

    let passed = mark_passed(&mut state.pipes, state.bird.x);
    state.score += passed;

    let collision = entry.or_else(|| find_collision(&state.bird, &state.pipes));

    TickOutcome { passed, collision }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{GamePhase, Pipe};

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_tick_frozen_outside_playing() {
        let mut state = GameState::new(1);
        let before = state.bird.clone();
        for _ in 0..10 {
            assert_eq!(tick(&mut state), TickOutcome::default());
        }
        assert_eq!(state.bird, before);
        assert_eq!(state.frame_count, 0);

        state.phase = GamePhase::GameOver;
        tick(&mut state);
        assert_eq!(state.bird, before);
    }

    #[test]
    fn test_pass_and_crash_same_tick_scores() {
        let mut state = playing(1);
        // Scrolls to right edge 99 (< bird.x) this tick
        let passed_id = state.next_pipe_id();
        state
            .pipes
            .push(Pipe::new(passed_id, BIRD_X - PIPE_WIDTH + PIPE_SPEED - 1.0, 250.0));
        // Bird is about to hit the ground
        state.bird.y = PLAY_HEIGHT - GROUND_HEIGHT - BIRD_HEIGHT - 0.1;
        state.bird.velocity = 5.0;

        let outcome = tick(&mut state);
        assert_eq!(outcome.passed, 1);
        assert_eq!(state.score, 1);
        assert_eq!(outcome.collision, Some(CollisionKind::Ground));
    }

    #[test]
    fn test_resting_on_ceiling_crashes() {
        let mut state = playing(1);
        state.bird.y = 0.0;
        state.bird.velocity = 0.0;
        let outcome = tick(&mut state);
        // Gravity already pulled it back below the ceiling
        assert!(state.bird.y > 0.0);
        assert_eq!(outcome.collision, Some(CollisionKind::Ceiling));
    }

    #[test]
    fn test_resting_on_ground_crashes_even_after_flap() {
        let mut state = playing(1);
        state.bird.y = PLAY_HEIGHT - GROUND_HEIGHT - BIRD_HEIGHT;
        state.bird.velocity = JUMP_STRENGTH;
        let outcome = tick(&mut state);
        assert_eq!(outcome.collision, Some(CollisionKind::Ground));
    }

    #[test]
    fn test_level_bird_in_open_sky_survives() {
        let mut state = playing(1);
        state.bird.y = 1.0;
        state.bird.velocity = 0.0;
        assert_eq!(tick(&mut state).collision, None);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        for i in 0..600 {
            if i % 20 == 0 {
                a.bird.velocity = JUMP_STRENGTH;
                b.bird.velocity = JUMP_STRENGTH;
            }
            tick(&mut a);
            tick(&mut b);
        }
        assert_eq!(a.pipes, b.pipes);
        assert_eq!(a.bird, b.bird);
    }
}
