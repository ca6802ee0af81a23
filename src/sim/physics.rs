//! Bird integration
//!
//! One explicit Euler step per tick, no sub-stepping.

use super::state::Bird;
use crate::consts::*;

/// Advance the bird by one tick: gravity, drag while falling, terminal
/// velocity clamp, then position.
pub fn step_bird(bird: &mut Bird) {
    bird.velocity += GRAVITY;
    if bird.velocity > 0.0 {
        bird.velocity *= AIR_DAMPING;
    }
    bird.velocity = bird.velocity.min(TERMINAL_VELOCITY);
    bird.y += bird.velocity;
}

/// Flap. Overwrites the velocity so a jump always feels the same no matter
/// how fast the bird was falling.
pub fn apply_jump(bird: &mut Bird) {
    bird.velocity = JUMP_STRENGTH;
}

/// Rotation in degrees for rendering (positive = nose down)
pub fn tilt_degrees(velocity: f32) -> f32 {
    (velocity * TILT_PER_VELOCITY).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gravity_accumulates() {
        let mut bird = Bird::default();
        step_bird(&mut bird);
        // 0.5 then damped because it is now falling
        assert!((bird.velocity - GRAVITY * AIR_DAMPING).abs() < 1e-6);
        assert!((bird.y - (BIRD_START_Y + GRAVITY * AIR_DAMPING)).abs() < 1e-4);
    }

    #[test]
    fn test_rising_bird_is_not_damped() {
        let mut bird = Bird::default();
        apply_jump(&mut bird);
        step_bird(&mut bird);
        assert_eq!(bird.velocity, JUMP_STRENGTH + GRAVITY);
        assert_eq!(bird.y, BIRD_START_Y + JUMP_STRENGTH + GRAVITY);
    }

    #[test]
    fn test_terminal_velocity_clamp() {
        let mut bird = Bird {
            velocity: 50.0,
            ..Default::default()
        };
        step_bird(&mut bird);
        assert_eq!(bird.velocity, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_tilt_is_bounded() {
        assert_eq!(tilt_degrees(0.0), 0.0);
        assert_eq!(tilt_degrees(100.0), MAX_TILT_DEGREES);
        assert_eq!(tilt_degrees(-100.0), -MAX_TILT_DEGREES);
        assert!((tilt_degrees(2.0) - 9.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_terminal(
            start in -20.0f32..20.0,
            jumps in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut bird = Bird { velocity: start, ..Default::default() };
            for jump in jumps {
                if jump {
                    apply_jump(&mut bird);
                }
                step_bird(&mut bird);
                prop_assert!(bird.velocity <= TERMINAL_VELOCITY);
            }
        }

        #[test]
        fn prop_jump_overwrites_velocity(prior in -1000.0f32..1000.0) {
            let mut bird = Bird { velocity: prior, ..Default::default() };
            apply_jump(&mut bird);
            prop_assert_eq!(bird.velocity, JUMP_STRENGTH);
        }
    }
}
