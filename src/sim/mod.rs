//! Collision and locomotion core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame-stepped ticks only
//! - Injected RNG only (terrain generation)
//! - Stable iteration order (by segment index)
//! - No rendering or platform dependencies

pub mod border;
pub mod collision;
pub mod geometry;
pub mod locomotion;
pub mod physics;
pub mod segment;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod window;

pub use border::BorderSquare;
pub use geometry::{
    circle_to_circle, closest_point_on_segment, is_circle_rectangle_coll, slope_angle_from_normal,
};
pub use physics::{PhysicsProfile, ProfileParams};
pub use segment::{Checkpoint, Segment};
pub use state::{
    Ball, Contact, ContactSource, GameEvent, Session, SessionSnapshot, TickOutcome,
};
pub use terrain::{ChartScale, Terrain, parse_chart_csv, start_position};
pub use tick::{TickInput, tick};
pub use window::TerrainWindow;
