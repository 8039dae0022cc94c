// Splitting linear moves into waypoint sequences

use crate::{kinematics::KinematicsError, vector::Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod adaptive;
pub mod naive;

pub use adaptive::{AdaptiveSegmentation, AdaptiveSegmenter, PartitionTrace};
pub use naive::NaiveTimeSegmenter;

/// Displacements shorter than this carry no motion.
pub const MIN_MOTION: f64 = 0.000_001;

/// A single linear move between two absolute positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub start: Vector,
    pub destination: Vector,
    /// Feed rate in mm/min
    pub feed_rate: f64,
    pub feed_multiplier_percent: u32,
}

impl Move {
    pub fn difference(&self) -> Vector {
        self.destination - self.start
    }

    /// Length of the move used for timing: the Cartesian travel, or the
    /// extrusion travel for extrude-only moves. `None` when neither moves.
    pub fn motion_length(&self) -> Option<f64> {
        let difference = self.difference();
        let cartesian = difference.magnitude();
        if cartesian >= MIN_MOTION {
            return Some(cartesian);
        }
        let extrusion = difference.e.abs();
        (extrusion >= MIN_MOTION).then_some(extrusion)
    }

    pub fn is_degenerate(&self) -> bool {
        self.motion_length().is_none()
    }
}

/// Tuning for both segmentation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Fixed subdivision rate of the naive segmenter
    pub segments_per_second: f64,
    /// Maximum squared actuator-space deviation, in mm², accepted by the
    /// adaptive segmenter
    pub tolerance_squared: f64,
    /// Deepest recursion level the adaptive segmenter may reach
    pub max_depth: u32,
    /// Abort the run instead of counting branches cut off at `max_depth`
    pub strict_depth_limit: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            segments_per_second: 200.0,
            tolerance_squared: 0.05 * 0.05,
            max_depth: 40,
            strict_depth_limit: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentationResult {
    pub waypoints: Vec<Vector>,
    /// Kinematics evaluations spent producing the waypoints
    pub calculation_count: u64,
}

impl SegmentationResult {
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum SegmentError {
    #[error("move to {position} has no displacement on any axis")]
    DegenerateMove { position: Vector },

    #[error("move to {destination} needs {steps} fixed-rate segments, more than {limit}")]
    TooManySteps {
        destination: Vector,
        steps: f64,
        limit: u64,
    },

    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

/// Join two adjacent waypoint runs that share their boundary point.
///
/// The head of `right` duplicates the tail of `left` and is dropped.
pub fn merge(mut left: Vec<Vector>, right: Vec<Vector>) -> Vec<Vector> {
    debug_assert_eq!(left.last(), right.first());
    left.extend(right.into_iter().skip(1));
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: f64, to: f64) -> Move {
        Move {
            start: Vector::new(from, 0.0, 0.0, 0.0),
            destination: Vector::new(to, 0.0, 0.0, 0.0),
            feed_rate: 1500.0,
            feed_multiplier_percent: 100,
        }
    }

    #[test]
    fn merge_drops_shared_point() {
        let a = Vector::new(0.0, 0.0, 0.0, 0.0);
        let b = Vector::new(1.0, 0.0, 0.0, 0.0);
        let c = Vector::new(2.0, 0.0, 0.0, 0.0);
        let d = Vector::new(3.0, 0.0, 0.0, 0.0);
        assert_eq!(merge(vec![a, b], vec![b, c, d]), vec![a, b, c, d]);
    }

    #[test]
    fn motion_length_falls_back_to_extrusion() {
        assert_eq!(line(0.0, 10.0).motion_length(), Some(10.0));

        let mut extrude = line(5.0, 5.0);
        extrude.destination.e = -2.5;
        assert_eq!(extrude.motion_length(), Some(2.5));

        assert_eq!(line(5.0, 5.0).motion_length(), None);
        assert!(line(5.0, 5.0 + 1e-9).is_degenerate());
    }
}
