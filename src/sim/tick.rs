//! Frame-stepped simulation tick
//!
//! One tick runs, in order: world motion (moving wall, checkpoint bobbing,
//! hazard ball), avatar locomotion, collision resolution, then window
//! streaming. Nothing here suspends or fails; death and finishing are
//! reported through [`TickOutcome`] and [`GameEvent`]s.

use glam::DVec2;

use super::border::BorderSquare;
use super::collision::{find_contact, hazard_steer, respond};
use super::geometry::{circle_to_circle, closest_point_on_segment, is_circle_rectangle_coll};
use super::locomotion::{self, Jump};
use super::physics::PhysicsProfile;
use super::state::{Contact, ContactSource, GameEvent, Session, TickOutcome};
use super::terrain::start_position;
use crate::consts::*;

/// Input intent for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered: true only on the tick the key went down
    pub jump_pressed: bool,
    pub jump_held: bool,
    /// Selects the Compact profile while held
    pub modifier_held: bool,
    /// Fast fall while airborne
    pub down_held: bool,
    pub escape_pressed: bool,
}

/// Advance the session by one tick
pub fn tick(session: &mut Session, input: &TickInput) -> TickOutcome {
    if input.escape_pressed {
        log::info!("Leaving level with score {}", session.score);
        return TickOutcome::Exit;
    }
    if session.avatar.died {
        return TickOutcome::Died;
    }

    session.time_ticks += 1;
    trim_fractions(session);

    // Moving wall catches up fast, then creeps
    let distance = (session.avatar.pos.x - session.moving_wall.a.x).abs();
    let speed = if distance > session.tuning.wall_fast_distance {
        session.config.wall_speed_fast
    } else {
        session.config.wall_speed_slow
    };
    session.moving_wall.shift_x(speed);

    let amplitude = session.config.checkpoint_bob_amplitude;
    let active = session.window.active();
    for seg in &mut session.terrain.segments[active] {
        if let Some(cp) = seg.checkpoint.as_mut().filter(|cp| !cp.is_finish) {
            cp.bob(amplitude);
        }
    }

    session.hazard.pos += session.hazard.vel;

    if let Some(border) = BorderSquare::around(session.active_segments(), &session.tuning) {
        session.border = border;
    }

    let jump = locomotion::step(
        &mut session.avatar,
        input,
        &mut session.score,
        &session.tuning,
    );
    if let Some(kind) = jump {
        session.events.push(GameEvent::ScoreChanged(-1));
        if kind == Jump::Ground {
            // Leave a mark where the ball took off
            session
                .fractions
                .extend(session.contacts.iter().map(|c| c.point));
        }
    }

    session.hazard.vel *= session.config.hazard_ball_slow;

    session.resolve_collisions();

    if session.avatar.died {
        log::info!(
            "Avatar died at ({:.0}, {:.0})",
            session.avatar.pos.x,
            session.avatar.pos.y
        );
        session.events.push(GameEvent::Died);
        return TickOutcome::Died;
    }
    if session.finished {
        return TickOutcome::Finished;
    }

    if session
        .window
        .advance_if_past_middle(session.avatar.pos.x, &session.terrain.segments)
    {
        let window_x = session.terrain.segments[session.window.base()].a.x;
        if session.moving_wall.a.x > session.avatar.pos.x {
            session.moving_wall.set_x(window_x);
        }
    }

    TickOutcome::Running
}

fn trim_fractions(session: &mut Session) {
    let interval = u64::from(session.tuning.fraction_trim_interval.max(1));
    if session.time_ticks % interval != 0 || session.fractions.is_empty() {
        return;
    }
    let n = if session.fractions.len() > 20 { 20 } else { 1 };
    session.fractions.drain(..n);
}

impl Session {
    /// Collision pass for the avatar and the hazard ball
    ///
    /// Leaves this tick's contacts in [`Session::contacts`] and may set the
    /// died and finished flags.
    pub fn resolve_collisions(&mut self) {
        self.keep_avatar_in_bounds();

        if circle_to_circle(
            self.avatar.pos,
            self.avatar.radius,
            self.hazard.pos,
            self.hazard.radius,
        ) {
            self.avatar.died = true;
        }

        let contacts = self.collect_contacts();
        respond(&mut self.avatar, &contacts, &self.tuning);
        self.move_hazard_ball();
        self.contacts = contacts;
    }

    /// Teleport an escaped avatar back to the checkpoint or the window start
    fn keep_avatar_in_bounds(&mut self) {
        let radius = self.avatar.radius;
        if is_circle_rectangle_coll(self.avatar.pos, radius, &self.border) {
            return;
        }

        let target = self
            .checkpoint
            .as_ref()
            .map(|cp| cp.position)
            .filter(|&p| is_circle_rectangle_coll(p, radius, &self.border))
            .or_else(|| {
                // Spawn height is always for the rolling ball
                let spawn_radius = PhysicsProfile::Normal.params().radius;
                self.active_segments()
                    .first()
                    .map(|seg| start_position(seg, spawn_radius))
            });

        self.avatar.vel = DVec2::ZERO;
        if let Some(target) = target {
            log::debug!(
                "Avatar out of bounds at ({:.0}, {:.0}), respawning at ({:.0}, {:.0})",
                self.avatar.pos.x,
                self.avatar.pos.y,
                target.x,
                target.y
            );
            self.avatar.pos = target;
        }
    }

    fn collect_contacts(&mut self) -> Vec<Contact> {
        let (pos, radius) = (self.avatar.pos, self.avatar.radius);
        let skin = self.tuning.wall_thickness;
        let mut contacts = Vec::new();

        for i in self.window.active() {
            let seg = &self.terrain.segments[i];
            if let Some(contact) = find_contact(pos, radius, skin, seg, ContactSource::Terrain(i)) {
                if seg.is_hazard && self.score > 0 {
                    self.add_score(-1);
                }
                contacts.push(contact);
            }
            self.collect_checkpoint(i);
        }

        for edge in self.border.solid_edges() {
            contacts.extend(find_contact(pos, radius, skin, edge, ContactSource::Border));
        }

        if let Some(contact) =
            find_contact(pos, radius, skin, &self.moving_wall, ContactSource::MovingWall)
        {
            self.avatar.died = true;
            contacts.push(contact);
        }

        contacts
    }

    /// Capture the checkpoint on segment `index` if the avatar overlaps it
    fn collect_checkpoint(&mut self, index: usize) {
        let (pos, radius) = (self.avatar.pos, self.avatar.radius);
        let seg = &mut self.terrain.segments[index];
        let hit = seg
            .checkpoint
            .as_ref()
            .is_some_and(|cp| circle_to_circle(pos, radius, cp.position, cp.radius));
        if !hit {
            return;
        }
        let Some(cp) = seg.take_checkpoint() else {
            return;
        };

        let reward = self.config.checkpoint_reward;
        self.add_score(reward);
        self.events.push(GameEvent::CheckpointReached {
            position: cp.position,
            is_finish: cp.is_finish,
        });

        if cp.is_finish {
            self.add_score(reward * FINISH_BONUS_MULTIPLIER);
            self.finished = true;
            log::info!("Finish reached, level score {}", self.score);
        } else {
            log::info!(
                "Checkpoint captured at ({:.0}, {:.0}), level score {}",
                cp.position.x,
                cp.position.y,
                self.score
            );
        }
        self.checkpoint = Some(cp);
    }

    /// Keep the hazard ball patrolling the terrain, re-homing it when it strays
    fn move_hazard_ball(&mut self) {
        let (pos, radius) = (self.hazard.pos, self.hazard.radius);
        let left = &self.border.left;
        let escaped = !is_circle_rectangle_coll(pos, radius, &self.border);
        let at_left_wall = pos.distance(closest_point_on_segment(left.a, left.b, pos)) < radius;

        if escaped || at_left_wall {
            let respawn = self
                .active_segments()
                .last()
                .map(|seg| DVec2::new(seg.b.x - radius, seg.min_y() - radius));
            if let Some(respawn) = respawn {
                log::debug!("Hazard ball re-homed to ({:.0}, {:.0})", respawn.x, respawn.y);
                self.hazard.pos = respawn;
                self.hazard.vel = DVec2::ZERO;
            }
            return;
        }

        if let Some(steer) = hazard_steer(pos, self.active_segments()) {
            self.hazard.vel += steer;
        }
    }
}
