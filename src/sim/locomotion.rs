//! Avatar locomotion: input, jumping, gravity and integration
//!
//! Runs before collision resolution each tick. Reads the on-ground flag and
//! jump impulse left behind by the previous collision pass.

use super::physics::PhysicsProfile;
use super::state::Ball;
use super::tick::TickInput;
use crate::consts::MAX_DOUBLE_JUMPS;
use crate::tuning::PhysicsTuning;

/// A jump performed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    /// Taken off from a contact
    Ground,
    /// Extra jump in the air
    Air,
}

/// Which jump (if any) the input asks for in the ball's current state
fn requested_jump(ball: &Ball, input: &TickInput) -> Option<Jump> {
    match ball.profile {
        PhysicsProfile::Normal if input.jump_pressed => {
            if ball.on_ground {
                Some(Jump::Ground)
            } else if ball.double_jumps < MAX_DOUBLE_JUMPS {
                Some(Jump::Air)
            } else {
                None
            }
        }
        PhysicsProfile::Compact if input.jump_held && ball.on_ground => Some(Jump::Ground),
        _ => None,
    }
}

/// Advance the avatar by one tick of input and integration
///
/// Every jump costs one point of `score`; with no score left the jump input
/// is ignored. Returns the jump taken, if any.
pub fn step(
    ball: &mut Ball,
    input: &TickInput,
    score: &mut i64,
    tuning: &PhysicsTuning,
) -> Option<Jump> {
    ball.set_profile(PhysicsProfile::select(input.modifier_held));
    let p = ball.profile.params();

    if input.move_right {
        ball.vel.x += p.speed_run;
        ball.facing_right = true;
    }
    if input.move_left {
        ball.vel.x -= p.speed_run;
        ball.facing_right = false;
    }

    let jump = if *score > 0 { requested_jump(ball, input) } else { None };
    if let Some(kind) = jump {
        *score -= 1;
        if kind == Jump::Air {
            ball.double_jumps += 1;
        }
        ball.on_ground = false;
        ball.vel += ball.jump_vel;
    }

    // Fast fall
    if input.down_held && !ball.on_ground {
        ball.vel -= ball.jump_vel;
    }

    ball.vel.y += p.gravity;
    ball.vel.y = ball.vel.y.clamp(-tuning.max_fall_speed, tuning.max_fall_speed);
    ball.vel.x = ball.vel.x.clamp(-tuning.max_run_speed, tuning.max_run_speed);

    ball.pos += ball.vel;
    ball.vel *= tuning.damping;

    let left_limit = ball.radius + tuning.left_margin;
    if ball.pos.x < left_limit {
        ball.pos.x = left_limit;
        ball.vel.x = tuning.left_nudge;
    }

    jump
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn grounded_ball() -> Ball {
        let mut ball = Ball::avatar(DVec2::new(500.0, -130.0));
        ball.on_ground = true;
        ball
    }

    #[test]
    fn test_gravity_then_damping() {
        let mut ball = Ball::avatar(DVec2::new(500.0, -500.0));
        let mut score = 0;
        step(&mut ball, &TickInput::default(), &mut score, &PhysicsTuning::default());

        assert!((ball.pos.y - (-500.0 + 0.95)).abs() < 1e-12);
        assert!((ball.vel.y - 0.95 * 0.995).abs() < 1e-12);
    }

    #[test]
    fn test_run_accelerates_and_clamps() {
        let mut ball = grounded_ball();
        let mut score = 0;
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            step(&mut ball, &input, &mut score, &PhysicsTuning::default());
        }
        assert!(ball.vel.x <= 10.0);
        assert!(ball.vel.x > 9.0);
        assert!(ball.facing_right);
    }

    #[test]
    fn test_jump_costs_score() {
        let mut ball = grounded_ball();
        let mut score = 5;
        let input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        let jump = step(&mut ball, &input, &mut score, &PhysicsTuning::default());

        assert_eq!(jump, Some(Jump::Ground));
        assert_eq!(score, 4);
        assert!(!ball.on_ground);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_no_jump_without_score() {
        let mut ball = grounded_ball();
        let mut score = 0;
        let input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        assert_eq!(step(&mut ball, &input, &mut score, &PhysicsTuning::default()), None);
        assert_eq!(score, 0);
        assert!(ball.on_ground);
    }

    #[test]
    fn test_single_double_jump() {
        let mut ball = grounded_ball();
        let mut score = 10;
        let jump = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        let tuning = PhysicsTuning::default();

        assert_eq!(step(&mut ball, &jump, &mut score, &tuning), Some(Jump::Ground));
        assert_eq!(step(&mut ball, &jump, &mut score, &tuning), Some(Jump::Air));
        assert_eq!(step(&mut ball, &jump, &mut score, &tuning), None);
        assert_eq!(score, 8);
    }

    #[test]
    fn test_compact_jumps_while_held_on_ground_only() {
        let mut ball = grounded_ball();
        let mut score = 10;
        let tuning = PhysicsTuning::default();
        let held = TickInput {
            jump_held: true,
            modifier_held: true,
            ..Default::default()
        };

        assert_eq!(step(&mut ball, &held, &mut score, &tuning), Some(Jump::Ground));
        assert_eq!(ball.profile, PhysicsProfile::Compact);
        // Airborne now: holding does nothing
        assert_eq!(step(&mut ball, &held, &mut score, &tuning), None);
        assert_eq!(score, 9);
    }

    #[test]
    fn test_fast_fall() {
        let mut ball = Ball::avatar(DVec2::new(500.0, -500.0));
        let mut score = 0;
        let input = TickInput {
            down_held: true,
            ..Default::default()
        };
        step(&mut ball, &input, &mut score, &PhysicsTuning::default());
        // jump_vel is (0, -30): subtracting it drives the ball down at max speed
        assert!((ball.vel.y - 20.0 * 0.995).abs() < 1e-12);
    }

    #[test]
    fn test_left_edge_clamp() {
        let mut ball = Ball::avatar(DVec2::new(31.0, -500.0));
        ball.vel.x = -5.0;
        let mut score = 0;
        step(&mut ball, &TickInput::default(), &mut score, &PhysicsTuning::default());
        assert_eq!(ball.pos.x, 30.0);
        assert_eq!(ball.vel.x, 1.0);
    }
}
