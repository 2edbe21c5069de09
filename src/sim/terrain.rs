//! Terrain generation from chart samples
//!
//! A chart is an ordered list of points; consecutive points become ground
//! segments. Generation sprinkles checkpoints and hazard runs over the
//! segments according to the difficulty table and always ends the level
//! with a finish checkpoint.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::segment::{Checkpoint, Segment};
use crate::consts::*;
use crate::error::LevelError;
use crate::tuning::DifficultyConfig;

/// Stretch applied to raw chart rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartScale {
    pub x: f64,
    pub y: f64,
}

impl Default for ChartScale {
    fn default() -> Self {
        Self {
            x: CHART_SCALE_X,
            y: CHART_SCALE_Y,
        }
    }
}

/// Parse `x,y` rows into scaled sample points
///
/// Blank lines are skipped, as is a non-numeric header on the first line.
pub fn parse_chart_csv(text: &str, scale: ChartScale) -> Result<Vec<DVec2>, LevelError> {
    let mut points = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',').map(|f| f.trim().trim_matches('"'));
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            return Err(LevelError::Malformed {
                line: i + 1,
                reason: "expected two columns".to_string(),
            });
        };

        let x = match x.parse::<f64>() {
            Ok(x) => x,
            Err(_) if i == 0 => continue, // header row
            Err(e) => {
                return Err(LevelError::Malformed {
                    line: i + 1,
                    reason: format!("invalid X coordinate: {e}"),
                });
            }
        };
        let y = y.parse::<f64>().map_err(|e| LevelError::Malformed {
            line: i + 1,
            reason: format!("invalid Y coordinate: {e}"),
        })?;

        points.push(DVec2::new(x * scale.x, y * scale.y));
    }

    if points.is_empty() {
        return Err(LevelError::Empty);
    }
    Ok(points)
}

/// The master segment array of a loaded level
#[derive(Debug, Clone)]
pub struct Terrain {
    pub segments: Vec<Segment>,
    /// X of the last point
    pub max_x: f64,
    /// Highest point of the chart (most negative Y, never above 0)
    pub max_y: f64,
}

impl Terrain {
    /// Build the level from samples
    ///
    /// Fails if the samples cannot fill both window buffers.
    pub fn generate(
        points: &[DVec2],
        config: &DifficultyConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, LevelError> {
        if points.len() < 2 {
            return Err(LevelError::Empty);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LevelError::NonFinite { index });
        }

        let required = config.window_size * 2;
        let count = points.len() - 1;
        if count <= required {
            return Err(LevelError::TooShort {
                segments: count,
                required,
            });
        }

        let mut segments = Vec::with_capacity(count);
        let mut max_y = 0.0_f64;
        // Hazard segments still owed in the current run
        let mut hazard_left = 0usize;

        for (i, pair) in points.windows(2).enumerate() {
            let mut seg = Segment::new(pair[0], pair[1]);

            if i.checked_rem(config.checkpoint_spacing) == Some(0) {
                let start = seg.pos_with_min_y() - seg.normal() * CHECKPOINT_NORMAL_OFFSET;
                let jitter = rng.random_range(0..CHECKPOINT_JITTER) as f64;
                let position = DVec2::new(start.x, start.y - jitter);
                seg.checkpoint = Some(Checkpoint::new(position, start, CHECKPOINT_RADIUS));
            }

            if i > config.window_size && i.checked_rem(config.hazard_spacing) == Some(0) {
                hazard_left = HAZARD_RUN_LENGTH;
            }
            if hazard_left > 0 {
                seg.is_hazard = true;
                hazard_left -= 1;
            }

            max_y = max_y.min(seg.min_y());
            segments.push(seg);
        }

        // Finish line replaces whatever the last segment carried
        let last = segments.len() - 1;
        let finish_pos = DVec2::new(segments[last].a.x, segments[last].min_y() - FINISH_LIFT);
        segments[last].checkpoint = Some(Checkpoint::finish(finish_pos, FINISH_RADIUS));

        let max_x = segments[last].b.x;
        log::info!(
            "Generated terrain: {} segments, {} checkpoints, {} hazard segments",
            segments.len(),
            segments.iter().filter(|s| s.checkpoint.is_some()).count(),
            segments.iter().filter(|s| s.is_hazard).count()
        );

        Ok(Self {
            segments,
            max_x,
            max_y,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment spanning `x` (clamped to the array)
    pub fn index_at_x(&self, x: f64) -> usize {
        self.segments
            .partition_point(|s| s.b.x <= x)
            .min(self.segments.len().saturating_sub(1))
    }
}

/// Spawn point resting on top of a segment
pub fn start_position(segment: &Segment, radius: f64) -> DVec2 {
    DVec2::new(segment.mid_x(), segment.min_y() - radius)
}
