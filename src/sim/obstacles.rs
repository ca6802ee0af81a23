//! Pipe generation, scrolling and pruning

use rand::Rng;

use super::state::{GameState, Pipe};
use crate::consts::*;

/// Valid range for the top of a gap: the gap never gets closer than
/// `PIPE_EDGE_MARGIN` to the ceiling or the bottom of the play area.
pub fn gap_top_range() -> std::ops::Range<f32> {
    PIPE_EDGE_MARGIN..(PLAY_HEIGHT - PIPE_GAP - PIPE_EDGE_MARGIN)
}

/// Draw a gap position from the gameplay RNG
pub fn random_gap_top<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(gap_top_range())
}

/// A pipe is pruned once its right edge is fully past the left margin
#[inline]
pub fn is_offscreen(pipe: &Pipe) -> bool {
    pipe.right() <= -PIPE_PRUNE_MARGIN
}

/// Scroll, prune, then spawn on the fixed cadence.
///
/// The frame counter advances before the spawn check, so starting from an
/// empty list the first pipe appears at the right edge on tick
/// `PIPE_SPAWN_PERIOD`, not on tick zero.
pub fn advance_pipes(state: &mut GameState) {
    for pipe in &mut state.pipes {
        pipe.x -= PIPE_SPEED;
    }
    state.pipes.retain(|p| !is_offscreen(p));

    state.frame_count += 1;
    if state.frame_count.is_multiple_of(PIPE_SPAWN_PERIOD) {
        spawn_pipe(state);
    }
}

/// Push a new pipe at the right edge of the play area
pub fn spawn_pipe(state: &mut GameState) {
    let gap_top = random_gap_top(&mut state.rng);
    let id = state.next_pipe_id();
    log::debug!("Spawning pipe {} with gap at {:.1}", id, gap_top);
    state.pipes.push(Pipe::new(id, PLAY_WIDTH, gap_top));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pipe_after_exactly_one_period() {
        let mut state = GameState::new(42);
        for _ in 0..PIPE_SPAWN_PERIOD - 1 {
            advance_pipes(&mut state);
        }
        assert!(state.pipes.is_empty());

        advance_pipes(&mut state);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, PLAY_WIDTH);
    }

    #[test]
    fn test_pipes_scroll_left() {
        let mut state = GameState::new(42);
        let id = state.next_pipe_id();
        state.pipes.push(Pipe::new(id, 500.0, 200.0));
        advance_pipes(&mut state);
        assert_eq!(state.pipes[0].x, 500.0 - PIPE_SPEED);
    }

    #[test]
    fn test_offscreen_pipes_are_pruned() {
        let mut state = GameState::new(42);
        let keep = state.next_pipe_id();
        let drop = state.next_pipe_id();
        // Right edge lands exactly on the prune line after one scroll
        let x = -PIPE_PRUNE_MARGIN - PIPE_WIDTH + PIPE_SPEED;
        state.pipes.push(Pipe::new(drop, x, 200.0));
        state.pipes.push(Pipe::new(keep, x + 1.0, 200.0));
        advance_pipes(&mut state);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].id, keep);
    }

    #[test]
    fn test_gap_stays_inside_margins() {
        let mut state = GameState::new(9001);
        for _ in 0..500 {
            let top = random_gap_top(&mut state.rng);
            assert!(top >= PIPE_EDGE_MARGIN);
            assert!(top + PIPE_GAP < PLAY_HEIGHT - PIPE_EDGE_MARGIN);
        }
    }

    #[test]
    fn test_margin_measured_from_play_area_edge() {
        let range = gap_top_range();
        assert_eq!(range.start, PIPE_EDGE_MARGIN);
        assert_eq!(range.end + PIPE_GAP, PLAY_HEIGHT - PIPE_EDGE_MARGIN);
        // Lowest gaps end flush with the top of the ground strip
        assert_eq!(range.end + PIPE_GAP, crate::sim::collision::ground_y());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut state = GameState::new(3);
        for _ in 0..PIPE_SPAWN_PERIOD * 4 {
            advance_pipes(&mut state);
        }
        let ids: Vec<u32> = state.pipes.iter().map(|p| p.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        for _ in 0..PIPE_SPAWN_PERIOD * 3 {
            advance_pipes(&mut a);
            advance_pipes(&mut b);
        }
        assert_eq!(a.pipes, b.pipes);
    }
}
