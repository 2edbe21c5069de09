//! Axis-aligned level volume around the active terrain window
//!
//! Edges are ordered clockwise from the bottom-left corner:
//! left (bottom -> top), top (left -> right), right (top -> bottom),
//! bottom (right -> left).

use glam::DVec2;

use super::segment::Segment;
use crate::tuning::PhysicsTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct BorderSquare {
    pub left: Segment,
    pub top: Segment,
    pub right: Segment,
    pub bottom: Segment,
}

impl BorderSquare {
    /// `top_y` is the smaller Y (higher on screen)
    pub fn new(left_x: f64, right_x: f64, top_y: f64, bottom_y: f64) -> Self {
        let bl = DVec2::new(left_x, bottom_y);
        let tl = DVec2::new(left_x, top_y);
        let tr = DVec2::new(right_x, top_y);
        let br = DVec2::new(right_x, bottom_y);
        Self {
            left: Segment::border(bl, tl),
            top: Segment::border(tl, tr),
            right: Segment::border(tr, br),
            bottom: Segment::border(br, bl),
        }
    }

    /// Box spanning the given terrain horizontally, padded vertically
    ///
    /// Returns `None` for an empty slice.
    pub fn around(segments: &[Segment], tuning: &PhysicsTuning) -> Option<Self> {
        let first = segments.first()?;
        let last = segments.last()?;
        let (min_y, max_y) = find_min_max_y(segments)?;
        Some(Self::new(
            first.a.x,
            last.b.x,
            min_y - tuning.border_ceiling_margin,
            max_y + tuning.border_floor_margin,
        ))
    }

    #[inline]
    pub fn left_x(&self) -> f64 {
        self.top.a.x
    }

    #[inline]
    pub fn right_x(&self) -> f64 {
        self.top.b.x
    }

    #[inline]
    pub fn top_y(&self) -> f64 {
        self.left.b.y
    }

    #[inline]
    pub fn bottom_y(&self) -> f64 {
        self.left.a.y
    }

    /// Edges the avatar collides with; the floor stays open so falls end in a respawn
    pub fn solid_edges(&self) -> [&Segment; 3] {
        [&self.left, &self.right, &self.top]
    }
}

/// Smallest and largest Y over a run of segments
pub fn find_min_max_y(segments: &[Segment]) -> Option<(f64, f64)> {
    let first = segments.first()?;
    let init = (first.min_y(), first.max_y());
    Some(
        segments
            .iter()
            .fold(init, |(lo, hi), s| (lo.min(s.min_y()), hi.max(s.max_y()))),
    )
}
