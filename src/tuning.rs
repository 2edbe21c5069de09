//! Difficulty tables and physics constants
//!
//! Everything that scales with difficulty lives in [`DifficultyConfig`];
//! constants that historically drifted between builds live in
//! [`PhysicsTuning`]. Both are plain values passed into generation and the
//! tick, never globals.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Difficult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Difficult => "DIFFICULT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "difficult" | "hard" => Some(Difficulty::Difficult),
            _ => None,
        }
    }

    /// Cycle Easy -> Medium -> Difficult -> Easy
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Difficult,
            Difficulty::Difficult => Difficulty::Easy,
        }
    }

    /// Built-in table for this difficulty
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                window_size: 80,
                checkpoint_spacing: 7,
                checkpoint_reward: 300,
                checkpoint_bob_amplitude: 20.0,
                hazard_spacing: 60,
                wall_speed_fast: 15.0,
                wall_speed_slow: 2.0,
                hazard_ball_slow: 0.5,
            },
            Difficulty::Medium => DifficultyConfig {
                window_size: 50,
                checkpoint_spacing: 11,
                checkpoint_reward: 200,
                checkpoint_bob_amplitude: 60.0,
                hazard_spacing: 50,
                wall_speed_fast: 16.0,
                wall_speed_slow: 4.0,
                hazard_ball_slow: 0.7,
            },
            Difficulty::Difficult => DifficultyConfig {
                window_size: 35,
                checkpoint_spacing: 15,
                checkpoint_reward: 300,
                checkpoint_bob_amplitude: 120.0,
                hazard_spacing: 30,
                wall_speed_fast: 17.0,
                wall_speed_slow: 5.0,
                hazard_ball_slow: 0.8,
            },
        }
    }
}

/// Per-difficulty gameplay scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Segments per window buffer (the active window holds two)
    pub window_size: usize,
    /// Every Nth segment carries a checkpoint
    pub checkpoint_spacing: usize,
    /// Score awarded per checkpoint
    pub checkpoint_reward: i64,
    /// Vertical bobbing range of checkpoints
    pub checkpoint_bob_amplitude: f64,
    /// Every Mth segment (after warm-up) starts a hazard run
    pub hazard_spacing: usize,
    /// Moving wall speed when far behind the avatar
    pub wall_speed_fast: f64,
    /// Moving wall speed when within a screen of the avatar
    pub wall_speed_slow: f64,
    /// Hazard ball velocity multiplier per tick (smaller = slower)
    pub hazard_ball_slow: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

/// Constants of the locomotion and collision core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Velocity multiplier applied after movement, both axes
    pub damping: f64,
    /// |vel.y| limit
    pub max_fall_speed: f64,
    /// |vel.x| limit
    pub max_run_speed: f64,
    /// Contact skin added to the radius when testing segments
    pub wall_thickness: f64,
    /// Seam nudge trigger, measured past `wall_thickness`: the nudge fires
    /// when mean penetration exceeds `wall_thickness + seam_threshold`
    pub seam_threshold: f64,
    /// Velocity added when sinking into a seam between segments
    pub seam_nudge: DVec2,
    /// Slopes steeper than this (degrees) cannot be hopped up in Normal profile
    pub climb_angle_deg: f64,
    /// Left world boundary is at x = radius + this
    pub left_margin: f64,
    /// Horizontal velocity given when pinned against the left boundary
    pub left_nudge: f64,
    /// Beyond this distance the moving wall uses its fast speed
    pub wall_fast_distance: f64,
    /// Height of the moving wall above the chart's top
    pub wall_height: f64,
    /// Moving wall start x on a fresh level
    pub wall_start_x: f64,
    /// Border floor sits this far below the window's lowest point
    pub border_floor_margin: f64,
    /// Border ceiling sits this far above the window's highest point
    pub border_ceiling_margin: f64,
    /// Hazard ball spawn, relative to the avatar spawn
    pub hazard_spawn_offset: DVec2,
    pub hazard_radius: f64,
    /// Ticks between fraction trims
    pub fraction_trim_interval: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            damping: 0.995,
            max_fall_speed: 20.0,
            max_run_speed: 10.0,
            wall_thickness: 3.0,
            seam_threshold: 2.0,
            seam_nudge: DVec2::new(1.0, -1.0),
            climb_angle_deg: 70.0,
            left_margin: 0.0,
            left_nudge: 1.0,
            wall_fast_distance: crate::consts::SCREEN_WIDTH,
            wall_height: 2000.0,
            wall_start_x: -crate::consts::SCREEN_WIDTH,
            border_floor_margin: 600.0,
            border_ceiling_margin: 2000.0,
            hazard_spawn_offset: DVec2::new(crate::consts::SCREEN_WIDTH, -400.0),
            hazard_radius: 25.0,
            fraction_trim_interval: 5,
        }
    }
}
