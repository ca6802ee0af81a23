//! Fixed timestep accumulator
//!
//! Converts variable animation-frame deltas into a whole number of
//! simulation ticks so physics speed does not depend on the display's
//! refresh rate.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    /// Timestamp (ms) of the previous frame, 0 before the first
    last_time: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
            last_time: 0.0,
        }
    }

    /// Feed an animation-frame timestamp (ms) and get the number of ticks to
    /// run. The first frame runs exactly one tick.
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            self.step
        };
        self.last_time = time_ms;
        self.advance(dt)
    }

    /// Add `dt` seconds and return how many whole steps are due.
    ///
    /// Long stalls are capped so a backgrounded tab does not fast-forward
    /// the game when it comes back.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Forget accumulated time (after pause/resume or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.frame(1000.0), 1);
    }

    #[test]
    fn test_sixty_hz_frames_run_one_tick_each() {
        let mut clock = FixedStep::new(0.01, 8);
        let mut total = 0;
        for _ in 0..100 {
            total += clock.advance(0.01 + 1e-5);
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn test_fast_display_skips_ticks() {
        // 120 Hz display, 60 Hz sim: about every other frame ticks
        let mut clock = FixedStep::new(1.0 / 60.0, 8);
        let total: u32 = (0..120).map(|_| clock.advance(1.0 / 120.0)).sum();
        assert!((59..=60).contains(&total));
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FixedStep::new(1.0 / 60.0, 8);
        let steps = clock.advance(5.0);
        assert!(steps <= 8);
        // At most one step of backlog survives the stall
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
    }
}
