// Fixed-rate segmentation: a constant number of segments per second of travel

use crate::segment::{Move, SegmentError, SegmentationResult};

/// Converts mm/min feed and percent multiplier into seconds of travel.
const FEED_TIME_SCALE: f64 = 6000.0;

/// Most segments a single move may be split into.
pub const MAX_STEPS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaiveTimeSegmenter {
    segments_per_second: f64,
}

impl NaiveTimeSegmenter {
    pub fn new(segments_per_second: f64) -> Self {
        Self {
            segments_per_second,
        }
    }

    /// Number of equal-time segments the move is split into, or `None`
    /// for a move without motion.
    ///
    /// Fails when the count is not finite or exceeds [`MAX_STEPS`], which
    /// happens for far-away targets and for a zero feed rate.
    pub fn step_count(&self, m: &Move) -> Result<Option<u64>, SegmentError> {
        let Some(length) = m.motion_length() else {
            return Ok(None);
        };
        let seconds =
            FEED_TIME_SCALE * length / m.feed_rate / f64::from(m.feed_multiplier_percent);
        let steps = (self.segments_per_second * seconds).floor();
        if steps.is_nan() || steps > MAX_STEPS as f64 {
            return Err(SegmentError::TooManySteps {
                destination: m.destination,
                steps,
                limit: MAX_STEPS,
            });
        }
        Ok(Some((steps as u64).max(1)))
    }

    /// Split the move into `step_count` equal parts.
    ///
    /// The result starts with `m.start` followed by one waypoint per step,
    /// the last of which is exactly `m.destination`. A move without motion
    /// yields no waypoints at all, not even its endpoints.
    pub fn segment(&self, m: &Move) -> Result<SegmentationResult, SegmentError> {
        let Some(steps) = self.step_count(m)? else {
            return Ok(SegmentationResult::default());
        };

        let difference = m.difference();
        let mut waypoints = Vec::with_capacity(steps as usize + 1);
        waypoints.push(m.start);
        for s in 1..steps {
            let fraction = s as f64 / steps as f64;
            waypoints.push(m.start + difference * fraction);
        }
        waypoints.push(m.destination);

        Ok(SegmentationResult {
            waypoints,
            calculation_count: steps,
        })
    }
}

impl Default for NaiveTimeSegmenter {
    fn default() -> Self {
        Self::new(200.0)
    }
}
