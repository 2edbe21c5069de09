//! Terrain segments and the checkpoints they carry

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::segment_normal;

/// One-shot pickup that saves the respawn point and pays out score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: DVec2,
    pub radius: f64,
    #[serde(default)]
    pub is_finish: bool,
    /// Lowest point of the bobbing band
    #[serde(default)]
    pub start_position: DVec2,
    #[serde(default)]
    pub moving_down: bool,
}

impl Checkpoint {
    pub fn new(position: DVec2, start_position: DVec2, radius: f64) -> Self {
        Self {
            position,
            radius,
            is_finish: false,
            start_position,
            moving_down: false,
        }
    }

    pub fn finish(position: DVec2, radius: f64) -> Self {
        Self {
            position,
            radius,
            is_finish: true,
            start_position: position,
            moving_down: false,
        }
    }

    /// Move one unit along the bobbing band of the given amplitude
    pub fn bob(&mut self, amplitude: f64) {
        self.position.y += if self.moving_down { 1.0 } else { -1.0 };

        // Height above the start point (up is negative Y)
        let lift = self.start_position.y - self.position.y;
        if lift < 0.0 {
            self.moving_down = false;
        }
        if lift > amplitude {
            self.moving_down = true;
        }
    }
}

/// A straight piece of terrain (or a border / moving wall pseudo-segment)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
    #[serde(default)]
    pub is_hazard: bool,
    #[serde(default)]
    pub is_moving_wall: bool,
    #[serde(default)]
    pub is_border: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            a,
            b,
            ..Default::default()
        }
    }

    pub fn border(a: DVec2, b: DVec2) -> Self {
        Self {
            is_border: true,
            ..Self::new(a, b)
        }
    }

    pub fn moving_wall(x: f64, top_y: f64) -> Self {
        Self {
            is_moving_wall: true,
            ..Self::new(DVec2::new(x, 0.0), DVec2::new(x, top_y))
        }
    }

    /// Unit perpendicular of A->B; winding decides which side it faces
    #[inline]
    pub fn normal(&self) -> DVec2 {
        segment_normal(self.a, self.b)
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.a.y.min(self.b.y)
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.a.y.max(self.b.y)
    }

    #[inline]
    pub fn mid_x(&self) -> f64 {
        (self.a.x + self.b.x) / 2.0
    }

    /// Endpoint with the smaller Y (the higher one on screen)
    pub fn pos_with_min_y(&self) -> DVec2 {
        if self.a.y <= self.b.y { self.a } else { self.b }
    }

    /// Whether terrain walkers (the hazard ball) may follow this segment
    pub fn is_plain_ground(&self) -> bool {
        !self.is_hazard && !self.is_moving_wall && !self.is_border
    }

    /// Collect the checkpoint, leaving none behind
    pub fn take_checkpoint(&mut self) -> Option<Checkpoint> {
        self.checkpoint.take()
    }

    /// Translate horizontally (moving wall)
    pub fn shift_x(&mut self, dx: f64) {
        self.a.x += dx;
        self.b.x += dx;
    }

    pub fn set_x(&mut self, x: f64) {
        self.a.x = x;
        self.b.x = x;
    }
}
