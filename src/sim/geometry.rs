//! Geometry kernel: point/segment/circle queries on `DVec2`
//!
//! Screen coordinates: X grows right, Y grows down, so "up" is negative Y
//! and gravity pulls toward +Y.

use glam::DVec2;

use super::border::BorderSquare;

/// Closest point to `p` on the segment `a`-`b` (not the infinite line)
pub fn closest_point_on_segment(a: DVec2, b: DVec2, p: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Circle-circle overlap; touching counts as a hit
#[inline]
pub fn circle_to_circle(pos_a: DVec2, radius_a: f64, pos_b: DVec2, radius_b: f64) -> bool {
    pos_a.distance(pos_b) <= radius_a + radius_b
}

/// Whether a circle overlaps the border rectangle
///
/// The centre is clamped into the rectangle's extent and the circle is tested
/// against the clamped point, so any centre inside the rectangle counts.
pub fn is_circle_rectangle_coll(center: DVec2, radius: f64, border: &BorderSquare) -> bool {
    let (top, bottom) = (border.top_y().min(border.bottom_y()), border.top_y().max(border.bottom_y()));
    let clamped = DVec2::new(
        center.x.clamp(border.left_x(), border.right_x()),
        center.y.clamp(top, bottom),
    );
    center.distance(clamped) < radius
}

/// Slope angle in degrees from a surface normal (0 = flat, 90 = wall)
///
/// The normal is first flipped to point against gravity, so segment winding
/// does not matter. A zero normal reads as flat.
pub fn slope_angle_from_normal(normal: DVec2) -> f64 {
    let up = if normal.y > 0.0 { -normal } else { normal };
    up.x.abs().atan2(up.y.abs()).to_degrees()
}

/// Perpendicular of `a`->`b`, normalized (zero for degenerate segments)
#[inline]
pub fn segment_normal(a: DVec2, b: DVec2) -> DVec2 {
    let d = b - a;
    DVec2::new(-d.y, d.x).normalize_or_zero()
}
