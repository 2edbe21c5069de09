//! Stock Jumper - a ball platformer over stock-price terrain
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (geometry, terrain, locomotion, collisions)
//! - `tuning`: Difficulty tables and physics constants
//! - `settings`: User settings persisted as JSON
//! - `score`: Per-difficulty score wallet
//! - `persistence`: Level records and chart files on disk

pub mod error;
pub mod persistence;
pub mod score;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, StoreError};
pub use score::ScoreBook;
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyConfig, PhysicsTuning};

/// Game configuration constants
pub mod consts {
    /// Nominal screen width; the moving wall speeds up beyond this distance
    pub const SCREEN_WIDTH: f64 = 1300.0;

    /// Chart samples are stretched by these factors (Y is flipped: up is negative)
    pub const CHART_SCALE_X: f64 = 10.0;
    pub const CHART_SCALE_Y: f64 = -50.0;

    /// Checkpoint defaults
    pub const CHECKPOINT_RADIUS: f64 = 20.0;
    pub const CHECKPOINT_NORMAL_OFFSET: f64 = 15.0;
    /// Upper bound (exclusive) of the random upward jitter
    pub const CHECKPOINT_JITTER: u32 = 200;

    /// Finish checkpoint sits this far above the last segment
    pub const FINISH_RADIUS: f64 = 50.0;
    pub const FINISH_LIFT: f64 = 100.0;
    /// Finish pays this many extra checkpoint rewards
    pub const FINISH_BONUS_MULTIPLIER: i64 = 5;

    /// Consecutive hazard segments per run
    pub const HAZARD_RUN_LENGTH: usize = 4;

    /// Selling a finished level multiplies its score by this
    pub const FINISHED_LEVEL_SELL_MULTIPLIER: i64 = 2;

    /// Maximum extra jumps in the air (Normal profile)
    pub const MAX_DOUBLE_JUMPS: u8 = 1;
}
