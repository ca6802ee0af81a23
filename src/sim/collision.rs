//! Collision detection between the bird and the world
//!
//! Everything here is a pure predicate over axis-aligned rectangles.

use super::state::{Bird, Pipe};
use crate::Rect;
use crate::consts::*;

/// What the bird ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Ceiling,
    Ground,
    /// The pipe with this ID
    Pipe(u32),
}

/// y of the top of the ground strip
#[inline]
pub fn ground_y() -> f32 {
    PLAY_HEIGHT - GROUND_HEIGHT
}

/// Ceiling/ground test. Both boundaries are inclusive.
pub fn hits_boundary(bird: &Rect) -> Option<CollisionKind> {
    if bird.y <= 0.0 {
        Some(CollisionKind::Ceiling)
    } else if bird.bottom() >= ground_y() {
        Some(CollisionKind::Ground)
    } else {
        None
    }
}

/// The bird hits a pipe when the columns overlap horizontally and any part of
/// the bird is outside the gap.
pub fn hits_pipe(bird: &Rect, pipe: &Pipe) -> bool {
    bird.overlaps_x(&pipe.column()) && (bird.y < pipe.gap_top || bird.bottom() > pipe.gap_bottom)
}

/// First collision found, if any. Pipe order is irrelevant.
pub fn find_collision(bird: &Bird, pipes: &[Pipe]) -> Option<CollisionKind> {
    let rect = bird.rect();
    hits_boundary(&rect).or_else(|| {
        pipes
            .iter()
            .find(|p| hits_pipe(&rect, p))
            .map(|p| CollisionKind::Pipe(p.id))
    })
}

/// Boolean form of [`find_collision`]
pub fn check_collision(bird: &Bird, pipes: &[Pipe]) -> bool {
    find_collision(bird, pipes).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird_at(y: f32) -> Bird {
        Bird {
            y,
            ..Default::default()
        }
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        assert_eq!(find_collision(&bird_at(0.0), &[]), Some(CollisionKind::Ceiling));
        assert_eq!(find_collision(&bird_at(-3.0), &[]), Some(CollisionKind::Ceiling));
        assert_eq!(find_collision(&bird_at(0.01), &[]), None);
    }

    #[test]
    fn test_ground_is_inclusive() {
        let touching = ground_y() - BIRD_HEIGHT;
        assert_eq!(find_collision(&bird_at(touching), &[]), Some(CollisionKind::Ground));
        assert_eq!(find_collision(&bird_at(touching - 0.5), &[]), None);
    }

    #[test]
    fn test_bird_inside_gap_is_safe() {
        let pipe = Pipe::new(1, BIRD_X - 10.0, 250.0);
        let bird = bird_at(260.0);
        assert!(!check_collision(&bird, &[pipe]));
    }

    #[test]
    fn test_bird_above_gap_hits() {
        let pipe = Pipe::new(1, BIRD_X - 10.0, 250.0);
        let bird = bird_at(249.0);
        assert_eq!(find_collision(&bird, &[pipe]), Some(CollisionKind::Pipe(1)));
    }

    #[test]
    fn test_bird_below_gap_hits() {
        let pipe = Pipe::new(4, BIRD_X, 100.0);
        // bottom edge 1px past gap_bottom (250)
        let bird = bird_at(250.0 - BIRD_HEIGHT + 1.0);
        assert_eq!(find_collision(&bird, &[pipe]), Some(CollisionKind::Pipe(4)));
    }

    #[test]
    fn test_flush_with_gap_edges_is_safe() {
        let pipe = Pipe::new(1, BIRD_X, 200.0);
        assert!(!check_collision(&bird_at(200.0), std::slice::from_ref(&pipe)));
        assert!(!check_collision(&bird_at(pipe.gap_bottom - BIRD_HEIGHT), &[pipe]));
    }

    #[test]
    fn test_no_horizontal_overlap_no_hit() {
        // Pipe ends exactly where the bird begins
        let behind = Pipe::new(1, BIRD_X - PIPE_WIDTH, 400.0);
        // Pipe starts exactly where the bird ends
        let ahead = Pipe::new(2, BIRD_X + BIRD_WIDTH, 400.0);
        assert!(!check_collision(&bird_at(100.0), &[behind, ahead]));
    }

    #[test]
    fn test_any_pipe_in_list_triggers() {
        let safe = Pipe::new(1, 500.0, 50.0);
        let deadly = Pipe::new(2, BIRD_X, 50.0);
        assert!(check_collision(&bird_at(300.0), &[safe.clone(), deadly.clone()]));
        assert!(check_collision(&bird_at(300.0), &[deadly, safe]));
    }
}
