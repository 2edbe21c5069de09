//! Session state and core simulation types
//!
//! Everything a running level needs between ticks lives in [`Session`].
//! What survives leaving the level lives in [`SessionSnapshot`].

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::border::BorderSquare;
use super::physics::PhysicsProfile;
use super::segment::{Checkpoint, Segment};
use super::terrain::{Terrain, start_position};
use super::window::TerrainWindow;
use crate::error::LevelError;
use crate::tuning::{DifficultyConfig, PhysicsTuning};

/// Events for the surrounding application (UI, persistence)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Died,
    CheckpointReached { position: DVec2, is_finish: bool },
    ScoreChanged(i64),
}

/// What a tick ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Died,
    Finished,
    /// Player asked to leave; persist [`Session::snapshot`]
    Exit,
}

/// Which pseudo-segment or terrain index a contact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    Terrain(usize),
    Border,
    MovingWall,
}

/// One segment touching the avatar this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub source: ContactSource,
    /// Nearest point on the segment
    pub point: DVec2,
    /// Unit vector from the segment toward the ball centre
    pub normal: DVec2,
    pub penetration: f64,
}

/// A ball entity (avatar or hazard)
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub on_ground: bool,
    pub facing_right: bool,
    pub profile: PhysicsProfile,
    /// Impulse the next jump will add (already scaled)
    pub jump_vel: DVec2,
    /// Extra jumps used since last touching ground
    pub double_jumps: u8,
    pub died: bool,
}

impl Ball {
    pub fn avatar(pos: DVec2) -> Self {
        let profile = PhysicsProfile::Normal;
        let p = profile.params();
        Self {
            pos,
            vel: DVec2::ZERO,
            radius: p.radius,
            on_ground: false,
            facing_right: true,
            profile,
            jump_vel: p.jump * p.jump_force,
            double_jumps: 0,
            died: false,
        }
    }

    pub fn hazard(pos: DVec2, radius: f64) -> Self {
        Self {
            radius,
            jump_vel: DVec2::ZERO,
            ..Self::avatar(pos)
        }
    }

    /// Switch profile, keeping the lowest point of the ball where it was
    pub fn set_profile(&mut self, profile: PhysicsProfile) {
        if profile == self.profile {
            return;
        }
        let radius = profile.params().radius;
        self.pos.y -= radius - self.radius;
        self.radius = radius;
        self.profile = profile;
    }
}

/// Per-difficulty progress that outlives a session
///
/// Every field is optional so a first run and a resume load the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_wall: Option<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_ball: Option<DVec2>,
    pub finished: bool,
}

/// A running level
#[derive(Debug, Clone)]
pub struct Session {
    pub terrain: Terrain,
    pub config: DifficultyConfig,
    pub tuning: PhysicsTuning,
    pub window: TerrainWindow,
    pub border: BorderSquare,
    pub moving_wall: Segment,
    pub avatar: Ball,
    pub hazard: Ball,
    /// Level score for the current difficulty
    pub score: i64,
    /// Last checkpoint captured (respawn point)
    pub checkpoint: Option<Checkpoint>,
    pub finished: bool,
    /// Contacts found by the last collision pass
    pub contacts: Vec<Contact>,
    /// Feedback points left by jumps (visual only)
    pub fractions: Vec<DVec2>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub time_ticks: u64,
}

impl Session {
    /// Generate the level from chart samples and enter it
    ///
    /// Nothing is kept if generation fails.
    pub fn load(
        points: &[DVec2],
        config: DifficultyConfig,
        tuning: PhysicsTuning,
        snapshot: &SessionSnapshot,
        rng: &mut impl Rng,
    ) -> Result<Self, LevelError> {
        let terrain = Terrain::generate(points, &config, rng)?;
        Ok(Self::new(terrain, config, tuning, snapshot))
    }

    /// Enter an already generated level, resuming from `snapshot`
    pub fn new(
        mut terrain: Terrain,
        config: DifficultyConfig,
        tuning: PhysicsTuning,
        snapshot: &SessionSnapshot,
    ) -> Self {
        let total = terrain.len();
        let size = config.window_size;
        let wall_top = terrain.max_y - tuning.wall_height;

        let (window, spawn, moving_wall) = match &snapshot.checkpoint {
            None => {
                let window = TerrainWindow::new(size, total);
                let near = window.near();
                let spawn_index = near.start + (near.len() as f64 * 0.05) as usize;
                let spawn = start_position(
                    &terrain.segments[spawn_index.min(total.saturating_sub(1))],
                    PhysicsProfile::Normal.params().radius,
                );
                let wall = Segment::moving_wall(tuning.wall_start_x, wall_top);
                (window, spawn, wall)
            }
            Some(saved) => {
                let index = terrain.index_at_x(saved.start_position.x);
                let window = TerrainWindow::around(index, size, total);
                // The saved checkpoint was already collected
                if let Some(seg) = terrain.segments.iter_mut().find(|s| {
                    s.checkpoint.as_ref().is_some_and(|c| {
                        c.is_finish == saved.is_finish
                            && (c.start_position.x - saved.start_position.x).abs() < 1e-6
                    })
                }) {
                    seg.checkpoint = None;
                }

                let window_x = terrain.segments[window.base()].a.x;
                let wall = match &snapshot.moving_wall {
                    Some(w)
                        if w.a.x <= saved.position.x
                            && w.b.x <= saved.position.x
                            && w.b.y <= wall_top =>
                    {
                        Segment {
                            is_moving_wall: true,
                            ..w.clone()
                        }
                    }
                    Some(_) => {
                        log::warn!("Saved moving wall is ahead of the checkpoint, resetting it");
                        Segment::moving_wall(window_x, wall_top)
                    }
                    None => Segment::moving_wall(window_x, wall_top),
                };
                (window, saved.position, wall)
            }
        };

        let hazard_pos = snapshot
            .hazard_ball
            .unwrap_or(spawn + tuning.hazard_spawn_offset);
        let border = BorderSquare::around(&terrain.segments[window.active()], &tuning)
            .unwrap_or_else(|| BorderSquare::new(0.0, terrain.max_x, wall_top, 0.0));

        log::info!(
            "Level entered: {} segments, window {:?}, spawn ({:.1}, {:.1}), score {}",
            total,
            window.active(),
            spawn.x,
            spawn.y,
            snapshot.score
        );

        Self {
            terrain,
            config,
            tuning,
            window,
            border,
            moving_wall,
            avatar: Ball::avatar(spawn),
            hazard: Ball::hazard(hazard_pos, tuning.hazard_radius),
            score: snapshot.score,
            checkpoint: snapshot.checkpoint.clone(),
            finished: snapshot.finished,
            contacts: Vec::new(),
            fractions: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Segments of the active window
    pub fn active_segments(&self) -> &[Segment] {
        &self.terrain.segments[self.window.active()]
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add to the level score and report the change
    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
        self.events.push(GameEvent::ScoreChanged(delta));
    }

    /// Progress to persist when leaving the level
    ///
    /// Dying resets the level for this difficulty.
    pub fn snapshot(&self) -> SessionSnapshot {
        if self.avatar.died {
            return SessionSnapshot::default();
        }
        SessionSnapshot {
            score: self.score,
            checkpoint: self.checkpoint.clone(),
            moving_wall: Some(self.moving_wall.clone()),
            hazard_ball: Some(self.hazard.pos),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn points(n: usize) -> Vec<DVec2> {
        (0..n).map(|i| DVec2::new(i as f64 * 10.0, -100.0)).collect()
    }

    fn config() -> DifficultyConfig {
        DifficultyConfig {
            window_size: 20,
            ..DifficultyConfig::default()
        }
    }

    #[test]
    fn test_first_run_spawn() {
        let mut rng = Pcg32::seed_from_u64(1);
        let s = Session::load(
            &points(100),
            config(),
            PhysicsTuning::default(),
            &SessionSnapshot::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(s.window.active(), 0..40);
        // 5% into the near buffer
        assert_eq!(s.avatar.pos, DVec2::new(15.0, -130.0));
        assert_eq!(s.moving_wall.a.x, PhysicsTuning::default().wall_start_x);
        assert!(s.moving_wall.is_moving_wall);
        assert_eq!(s.hazard.pos, s.avatar.pos + PhysicsTuning::default().hazard_spawn_offset);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_load_too_short_fails() {
        let mut rng = Pcg32::seed_from_u64(1);
        let err = Session::load(
            &points(41),
            config(),
            PhysicsTuning::default(),
            &SessionSnapshot::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::TooShort { .. }));
    }

    #[test]
    fn test_resume_from_checkpoint() {
        let mut rng = Pcg32::seed_from_u64(2);
        let terrain = Terrain::generate(&points(200), &config(), &mut rng).unwrap();
        // Checkpoint spacing 7 on Easy: segment 70 carries one
        let saved = terrain.segments[70].checkpoint.clone().unwrap();
        let snapshot = SessionSnapshot {
            score: 42,
            checkpoint: Some(saved.clone()),
            moving_wall: Some(Segment::moving_wall(10_000.0, -3000.0)),
            hazard_ball: Some(DVec2::new(900.0, -300.0)),
            finished: false,
        };

        let s = Session::new(terrain, config(), PhysicsTuning::default(), &snapshot);
        assert_eq!(s.window.near(), 50..70);
        assert_eq!(s.window.far(), 70..90);
        assert!(s.terrain.segments[70].checkpoint.is_none());
        assert_eq!(s.avatar.pos, saved.position);
        assert_eq!(s.hazard.pos, DVec2::new(900.0, -300.0));
        assert_eq!(s.score, 42);
        // Wall ahead of the checkpoint is pulled back to the window start
        assert_eq!(s.moving_wall.a.x, 500.0);
    }

    #[test]
    fn test_snapshot_after_death_resets() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = Session::load(
            &points(100),
            config(),
            PhysicsTuning::default(),
            &SessionSnapshot {
                score: 10,
                ..Default::default()
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(s.snapshot().score, 10);
        assert!(s.snapshot().moving_wall.is_some());

        s.avatar.died = true;
        assert_eq!(s.snapshot(), SessionSnapshot::default());
    }

    #[test]
    fn test_profile_switch_keeps_bottom() {
        let mut ball = Ball::avatar(DVec2::new(0.0, -130.0));
        let bottom = ball.pos.y + ball.radius;
        ball.set_profile(PhysicsProfile::Compact);
        assert_eq!(ball.pos.y + ball.radius, bottom);
        ball.set_profile(PhysicsProfile::Normal);
        assert_eq!(ball.pos.y + ball.radius, bottom);
        assert_eq!(ball.radius, 30.0);
    }
}
