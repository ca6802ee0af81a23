//! Pass detection

use super::state::Pipe;

/// Flag every pipe whose right edge is strictly behind `bird_x` and return
/// how many were newly passed. A pipe is only ever counted once.
pub fn mark_passed(pipes: &mut [Pipe], bird_x: f32) -> u32 {
    let mut passed = 0;
    for pipe in pipes.iter_mut().filter(|p| !p.passed) {
        if pipe.right() < bird_x {
            pipe.passed = true;
            passed += 1;
        }
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_pass_counted_once() {
        let mut pipes = vec![Pipe::new(0, BIRD_X - PIPE_WIDTH - 1.0, 200.0)];
        assert_eq!(mark_passed(&mut pipes, BIRD_X), 1);
        assert!(pipes[0].passed);
        for _ in 0..10 {
            assert_eq!(mark_passed(&mut pipes, BIRD_X), 0);
        }
    }

    #[test]
    fn test_right_edge_on_bird_is_not_passed() {
        let mut pipes = vec![Pipe::new(0, BIRD_X - PIPE_WIDTH, 200.0)];
        assert_eq!(mark_passed(&mut pipes, BIRD_X), 0);
        assert!(!pipes[0].passed);
    }

    #[test]
    fn test_multiple_pipes_same_tick() {
        let mut pipes = vec![
            Pipe::new(0, -50.0, 200.0),
            Pipe::new(1, -20.0, 200.0),
            Pipe::new(2, 300.0, 200.0),
        ];
        assert_eq!(mark_passed(&mut pipes, BIRD_X), 2);
        assert!(!pipes[2].passed);
    }
}
