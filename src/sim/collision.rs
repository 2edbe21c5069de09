//! Contact detection and response against straight segments
//!
//! The avatar can touch several segments at once (a polyline vertex, a
//! valley, a wall and the floor). Contacts are found independently, then
//! resolved together with a single averaged normal so that the ball rolls
//! smoothly over vertices instead of snagging on them.

use glam::DVec2;

use super::geometry::{closest_point_on_segment, slope_angle_from_normal};
use super::segment::Segment;
use super::state::{Ball, Contact, ContactSource};
use crate::tuning::PhysicsTuning;

/// Test a ball against one segment, with `skin` added to the radius
pub fn find_contact(
    center: DVec2,
    radius: f64,
    skin: f64,
    segment: &Segment,
    source: ContactSource,
) -> Option<Contact> {
    let point = closest_point_on_segment(segment.a, segment.b, center);
    let offset = center - point;
    let dist = offset.length();
    let reach = radius + skin;

    if dist < reach {
        Some(Contact {
            source,
            point,
            normal: offset.normalize_or_zero(),
            penetration: reach - dist,
        })
    } else {
        None
    }
}

/// Averaged normal (unit, or zero if the normals cancel) and mean penetration
pub fn average_contacts(contacts: &[Contact]) -> Option<(DVec2, f64)> {
    if contacts.is_empty() {
        return None;
    }
    let n = contacts.len() as f64;
    let normal = contacts
        .iter()
        .fold(DVec2::ZERO, |acc, c| acc + c.normal)
        .normalize_or_zero();
    let penetration = contacts.iter().map(|c| c.penetration).sum::<f64>() / n;
    Some((normal, penetration))
}

/// Push the ball out of its contacts and update grounding and jump impulse
///
/// With no contacts the ball is airborne and its next jump is the plain
/// profile jump.
pub fn respond(ball: &mut Ball, contacts: &[Contact], tuning: &PhysicsTuning) {
    let p = ball.profile.params();
    let mut avg_normal = DVec2::ZERO;

    if let Some((normal, penetration)) = average_contacts(contacts) {
        avg_normal = normal;
        ball.pos += normal * penetration;

        let vel_dot = ball.vel.dot(normal);
        if vel_dot < 0.0 {
            // Moving into the surface: drop the normal component, then friction
            let slide = ball.vel - normal * vel_dot;
            let bounce = -normal * vel_dot * p.bounce_factor;
            ball.vel = (slide + bounce) * p.friction;
        }

        // Sinking into the seam between two segments
        if penetration - tuning.wall_thickness > tuning.seam_threshold {
            ball.vel += tuning.seam_nudge;
        }

        ball.on_ground = true;
        ball.double_jumps = 0;
    } else {
        ball.on_ground = false;
    }

    let slope = slope_angle_from_normal(avg_normal);
    ball.jump_vel = ball
        .profile
        .jump_impulse(avg_normal, slope, tuning.climb_angle_deg);
}

/// Steering for the hazard ball: drift along the nearest plain ground segment
///
/// Returns `None` when no plain ground segment is available.
pub fn hazard_steer<'a>(pos: DVec2, segments: impl IntoIterator<Item = &'a Segment>) -> Option<DVec2> {
    segments
        .into_iter()
        .filter(|s| s.is_plain_ground())
        .map(|s| (s, pos.distance(closest_point_on_segment(s.a, s.b, pos))))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(s, _)| (s.a - s.b).normalize_or_zero() + (s.a - pos).normalize_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::PhysicsProfile;

    fn flat() -> Segment {
        Segment::new(DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0))
    }

    #[test]
    fn test_find_contact_within_skin() {
        let seg = flat();
        // 31 away: outside the radius, inside radius + skin
        let c = find_contact(DVec2::new(50.0, -31.0), 30.0, 3.0, &seg, ContactSource::Terrain(0)).unwrap();
        assert_eq!(c.point, DVec2::new(50.0, 0.0));
        assert_eq!(c.normal, DVec2::new(0.0, -1.0));
        assert!((c.penetration - 2.0).abs() < 1e-12);

        assert!(find_contact(DVec2::new(50.0, -34.0), 30.0, 3.0, &seg, ContactSource::Terrain(0)).is_none());
    }

    #[test]
    fn test_normal_points_to_ball_regardless_of_winding() {
        let reversed = Segment::new(DVec2::new(100.0, 0.0), DVec2::new(0.0, 0.0));
        let c = find_contact(DVec2::new(50.0, -10.0), 30.0, 3.0, &reversed, ContactSource::Border).unwrap();
        assert_eq!(c.normal, DVec2::new(0.0, -1.0));
    }

    #[test]
    fn test_average_contacts() {
        let contacts = [
            Contact {
                source: ContactSource::Terrain(0),
                point: DVec2::ZERO,
                normal: DVec2::new(-1.0, 0.0),
                penetration: 1.0,
            },
            Contact {
                source: ContactSource::Terrain(1),
                point: DVec2::ZERO,
                normal: DVec2::new(0.0, -1.0),
                penetration: 3.0,
            },
        ];
        let (n, p) = average_contacts(&contacts).unwrap();
        let expected = DVec2::new(-1.0, -1.0).normalize();
        assert!((n - expected).length() < 1e-12);
        assert_eq!(p, 2.0);
        assert!(average_contacts(&[]).is_none());
    }

    #[test]
    fn test_flat_landing_absorbs_fall() {
        let mut ball = Ball::avatar(DVec2::new(50.0, -30.0));
        ball.vel = DVec2::new(0.0, 0.945);
        let tuning = PhysicsTuning::default();
        let contacts: Vec<_> = find_contact(ball.pos, ball.radius, tuning.wall_thickness, &flat(), ContactSource::Terrain(0))
            .into_iter()
            .collect();

        respond(&mut ball, &contacts, &tuning);
        assert!(ball.on_ground);
        assert!(ball.vel.length() < 1e-12);
        assert!((ball.pos.y - (-33.0)).abs() < 1e-12);
        assert_eq!(ball.jump_vel, DVec2::new(0.0, -30.0));
    }

    #[test]
    fn test_steep_wall_scrambles() {
        let wall = Segment::new(DVec2::new(0.0, 0.0), DVec2::new(0.0, -200.0));
        let mut ball = Ball::avatar(DVec2::new(-31.0, -100.0));
        let tuning = PhysicsTuning::default();
        let contacts: Vec<_> = find_contact(ball.pos, ball.radius, tuning.wall_thickness, &wall, ContactSource::Terrain(0))
            .into_iter()
            .collect();

        respond(&mut ball, &contacts, &tuning);
        // Normal points away from the wall (-x); Normal profile scrambles along it
        assert_eq!(ball.jump_vel, DVec2::new(-10.0, 0.0));

        ball.set_profile(PhysicsProfile::Compact);
        respond(&mut ball, &contacts, &tuning);
        assert!((ball.jump_vel - DVec2::new(0.0, -14.0)).length() < 1e-9);
    }

    #[test]
    fn test_seam_nudge() {
        let mut ball = Ball::avatar(DVec2::new(50.0, -20.0));
        let tuning = PhysicsTuning::default();
        let contacts: Vec<_> = find_contact(ball.pos, ball.radius, tuning.wall_thickness, &flat(), ContactSource::Terrain(0))
            .into_iter()
            .collect();
        // 13 units deep: 10 past the skin
        respond(&mut ball, &contacts, &tuning);
        assert_eq!(ball.vel, tuning.seam_nudge);
    }

    #[test]
    fn test_seam_threshold_counts_past_skin() {
        let tuning = PhysicsTuning::default();
        // 5 deep: skin (3) + threshold (2) exactly, not past it
        let mut ball = Ball::avatar(DVec2::new(50.0, -28.0));
        let contacts: Vec<_> = find_contact(ball.pos, ball.radius, tuning.wall_thickness, &flat(), ContactSource::Terrain(0))
            .into_iter()
            .collect();
        respond(&mut ball, &contacts, &tuning);
        assert_eq!(ball.vel, DVec2::ZERO);
    }

    #[test]
    fn test_no_contacts_airborne() {
        let mut ball = Ball::avatar(DVec2::new(0.0, -500.0));
        ball.on_ground = true;
        ball.double_jumps = 1;
        respond(&mut ball, &[], &PhysicsTuning::default());
        assert!(!ball.on_ground);
        assert_eq!(ball.double_jumps, 1);
        assert_eq!(ball.jump_vel, DVec2::new(0.0, -30.0));
    }

    #[test]
    fn test_hazard_steer_skips_special_segments() {
        let mut hazard = flat();
        hazard.is_hazard = true;
        let far = Segment::new(DVec2::new(0.0, 500.0), DVec2::new(100.0, 500.0));
        let border = Segment::border(DVec2::new(0.0, -10.0), DVec2::new(100.0, -10.0));

        let steer = hazard_steer(DVec2::new(50.0, -5.0), [&hazard, &border, &far]).unwrap();
        // Follows `far`: (A - B) dir is -x, plus the pull toward A
        let expected = DVec2::new(-1.0, 0.0) + (DVec2::new(0.0, 500.0) - DVec2::new(50.0, -5.0)).normalize();
        assert!((steer - expected).length() < 1e-12);

        assert!(hazard_steer(DVec2::ZERO, [&hazard, &border]).is_none());
    }
}
