//! Streaming window over the master segment array
//!
//! The window is two back-to-back buffers: `near` (behind / under the
//! avatar) and `far` (ahead). Once the avatar passes the middle segment the
//! window advances by one buffer: the old far buffer becomes near and the
//! next chunk of the master array becomes far. Both buffers are plain index
//! ranges, so they can never dangle past the end of the array.

use std::ops::Range;

use super::segment::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainWindow {
    /// First master index of the near buffer
    base: usize,
    /// Configured length of one buffer
    size: usize,
    near_len: usize,
    far_len: usize,
}

impl TerrainWindow {
    /// Window for a fresh level: buffers `[0, size)` and `[size, 2*size)`
    pub fn new(size: usize, total: usize) -> Self {
        Self::at(0, size, total)
    }

    /// Window whose near buffer starts at `base`
    ///
    /// `base` is pulled back so the near buffer is full whenever the array
    /// holds at least one buffer's worth of segments.
    pub fn at(base: usize, size: usize, total: usize) -> Self {
        let base = base.min(total.saturating_sub(size));
        let near_len = size.min(total - base);
        let far_len = size.min(total - base - near_len);
        Self {
            base,
            size,
            near_len,
            far_len,
        }
    }

    /// Window resuming around segment `index`: one buffer of lead-in behind it
    pub fn around(index: usize, size: usize, total: usize) -> Self {
        Self::at(index.saturating_sub(size), size, total)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn near(&self) -> Range<usize> {
        self.base..self.base + self.near_len
    }

    pub fn far(&self) -> Range<usize> {
        let start = self.base + self.near_len;
        start..start + self.far_len
    }

    /// Both buffers as one contiguous range
    pub fn active(&self) -> Range<usize> {
        self.base..self.base + self.near_len + self.far_len
    }

    pub fn len(&self) -> usize {
        self.near_len + self.far_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Master index of the segment whose end marks the swap threshold
    ///
    /// Sits two thirds of the way through the active range.
    pub fn middle_index(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(self.base + (self.len() as f64 / 1.5) as usize)
    }

    /// Whether the window is full enough to advance at all
    pub fn can_advance(&self, total: usize) -> bool {
        self.len() >= self.size * 2 && self.active().end < total
    }

    /// Slide forward one buffer if the avatar is past the middle segment
    ///
    /// Returns true when the buffers were swapped. Never swaps into an empty
    /// tail: once the far buffer would be empty the window stays put.
    pub fn advance_if_past_middle(&mut self, avatar_x: f64, segments: &[Segment]) -> bool {
        let Some(mid) = self.middle_index() else {
            return false;
        };
        let Some(middle) = segments.get(mid) else {
            return false;
        };
        if avatar_x <= middle.b.x || !self.can_advance(segments.len()) {
            return false;
        }

        let next_start = self.active().end;
        let copy = self.size.min(segments.len() - next_start);
        self.base += self.near_len;
        self.near_len = self.far_len;
        self.far_len = copy;

        log::info!(
            "Window advanced: near {:?}, far {:?} of {}",
            self.near(),
            self.far(),
            segments.len()
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use proptest::prelude::*;

    fn flat(n: usize) -> Vec<Segment> {
        (0..n)
            .map(|i| {
                Segment::new(
                    DVec2::new(i as f64 * 10.0, 0.0),
                    DVec2::new((i + 1) as f64 * 10.0, 0.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_new_window_buffers() {
        let w = TerrainWindow::new(10, 45);
        assert_eq!(w.near(), 0..10);
        assert_eq!(w.far(), 10..20);
        assert_eq!(w.active(), 0..20);
        // (20 / 1.5) as usize == 13
        assert_eq!(w.middle_index(), Some(13));
    }

    #[test]
    fn test_no_advance_before_middle() {
        let segs = flat(45);
        let mut w = TerrainWindow::new(10, segs.len());
        assert!(!w.advance_if_past_middle(segs[13].b.x, &segs));
        assert_eq!(w.base(), 0);
    }

    #[test]
    fn test_advance_swaps_buffers() {
        let segs = flat(45);
        let mut w = TerrainWindow::new(10, segs.len());

        assert!(w.advance_if_past_middle(segs[13].b.x + 1.0, &segs));
        assert_eq!(w.near(), 10..20);
        assert_eq!(w.far(), 20..30);

        assert!(w.advance_if_past_middle(segs[23].b.x + 1.0, &segs));
        assert_eq!(w.near(), 20..30);
        assert_eq!(w.far(), 30..40);

        // Tail is only 5 long
        assert!(w.advance_if_past_middle(segs[33].b.x + 1.0, &segs));
        assert_eq!(w.near(), 30..40);
        assert_eq!(w.far(), 40..45);

        // Partial far buffer: the window stops here
        assert!(!w.advance_if_past_middle(10_000.0, &segs));
        assert_eq!(w.active(), 30..45);
    }

    #[test]
    fn test_never_swaps_into_empty_tail() {
        let segs = flat(40);
        let mut w = TerrainWindow::new(10, segs.len());
        assert!(w.advance_if_past_middle(1e9, &segs));
        assert!(w.advance_if_past_middle(1e9, &segs));
        assert_eq!(w.active(), 20..40);
        assert!(!w.advance_if_past_middle(1e9, &segs));
        assert!(!w.far().is_empty());
    }

    #[test]
    fn test_around_clamps() {
        let w = TerrainWindow::around(3, 10, 45);
        assert_eq!(w.near(), 0..10);

        let w = TerrainWindow::around(42, 10, 45);
        assert_eq!(w.near(), 32..42);
        assert_eq!(w.far(), 42..45);

        let w = TerrainWindow::around(100, 10, 45);
        assert_eq!(w.active(), 35..45);
        assert!(w.far().is_empty());
    }

    proptest! {
        #[test]
        fn prop_window_stays_in_range(
            total in 1usize..400,
            size in 1usize..60,
            start in 0usize..400,
            steps in 0usize..20,
        ) {
            let segs = flat(total);
            let mut w = TerrainWindow::around(start, size, total);
            for _ in 0..steps {
                prop_assert!(w.near().end <= total);
                prop_assert!(w.far().end <= total);
                prop_assert_eq!(w.near().end, w.far().start);
                let _ = w.advance_if_past_middle(f64::MAX, &segs);
            }
            prop_assert!(w.active().end <= total);
        }
    }
}
