//! Physics profiles
//!
//! The avatar switches between two movement profiles every tick depending on
//! whether the modifier key is held. Each profile is a fixed bundle of
//! constants; selection is by enum, never by reference identity.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Named movement profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhysicsProfile {
    /// Rolling ball: slope-gated hop, one double jump
    #[default]
    Normal,
    /// Modifier held: sticky ball that hops up any slope it touches
    Compact,
}

/// Movement constants of one profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Added to vel.y every tick
    pub gravity: f64,
    /// Scale of the remaining velocity after hitting a surface
    pub friction: f64,
    pub radius: f64,
    /// Horizontal acceleration per tick of held input
    pub speed_run: f64,
    /// Jump direction before scaling
    pub jump: DVec2,
    /// Multiplier applied to the jump direction
    pub jump_force: f64,
    /// Added to the contact normal on slopes too steep to hop up
    pub scramble_wall: DVec2,
    /// 0 = no bounce, 1 = perfect bounce
    pub bounce_factor: f64,
}

const NORMAL: ProfileParams = ProfileParams {
    gravity: 0.95,
    friction: 0.9,
    radius: 30.0,
    speed_run: 2.0,
    jump: DVec2::new(0.0, -3.0),
    jump_force: 10.0,
    scramble_wall: DVec2::new(0.0, 0.0),
    bounce_factor: 0.0,
};

const COMPACT: ProfileParams = ProfileParams {
    gravity: 1.0,
    friction: 0.0,
    radius: 45.0,
    speed_run: 2.0,
    jump: DVec2::new(0.0, -0.7),
    jump_force: 20.0,
    scramble_wall: DVec2::new(0.0, -3.0),
    bounce_factor: 0.0,
};

impl PhysicsProfile {
    /// Profile for this tick's modifier state
    pub fn select(modifier_held: bool) -> Self {
        if modifier_held {
            PhysicsProfile::Compact
        } else {
            PhysicsProfile::Normal
        }
    }

    pub fn params(&self) -> &'static ProfileParams {
        match self {
            PhysicsProfile::Normal => &NORMAL,
            PhysicsProfile::Compact => &COMPACT,
        }
    }

    /// Whether the jump impulse depends on the slope under the ball
    pub fn slope_gated(&self) -> bool {
        matches!(self, PhysicsProfile::Normal)
    }

    /// Scaled jump impulse for a contact with averaged normal `normal`
    ///
    /// `slope_deg` is the slope angle of that normal; steeper than
    /// `climb_angle_deg` makes the Normal profile scramble along the face
    /// instead of hopping straight up.
    pub fn jump_impulse(&self, normal: DVec2, slope_deg: f64, climb_angle_deg: f64) -> DVec2 {
        let p = self.params();
        let dir = if self.slope_gated() && slope_deg > climb_angle_deg {
            normal + p.scramble_wall
        } else {
            p.jump
        };
        dir * p.jump_force
    }
}
