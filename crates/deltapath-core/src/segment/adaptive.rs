//! Error-bounded segmentation.
//!
//! A move is bisected in Cartesian space until the actuator-space image of
//! each piece's midpoint lies within a squared tolerance of the straight
//! chord between the images of the piece's endpoints. Only the midpoint is
//! examined per split.
//!
//! Every split costs three kinematics evaluations (start, destination and
//! midpoint). Branches that reach the configured depth ceiling stop
//! splitting even when the tolerance has not been met; those are reported
//! in [`PartitionTrace::truncated_branches`].

use crate::{
    kinematics::{Kinematics, KinematicsError},
    segment::{Move, SegmentError, SegmentationResult, merge},
    vector::Vector,
};

/// Kinematics evaluations per midpoint test.
const CALCULATIONS_PER_SPLIT: u64 = 3;

/// Recursion counters for one adaptive segmentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionTrace {
    /// Midpoint deviation tests performed
    pub distance_calculations: u64,
    /// Deepest level at which a branch terminated; the first call is depth 1
    pub max_depth: u32,
    /// Branches cut off by the depth ceiling with the tolerance unmet
    pub truncated_branches: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveSegmentation {
    pub result: SegmentationResult,
    pub trace: PartitionTrace,
}

pub struct AdaptiveSegmenter<K> {
    kinematics: K,
    max_depth: u32,
}

impl<K: Kinematics> AdaptiveSegmenter<K> {
    pub fn new(kinematics: K, max_depth: u32) -> Self {
        Self {
            kinematics,
            max_depth: max_depth.max(1),
        }
    }

    /// Split `m` until every piece is within `tolerance_squared` (mm²) of
    /// the true actuator-space path at its midpoint.
    ///
    /// The waypoints always begin with `m.start` and end with
    /// `m.destination`. A move that does not change any axis is rejected
    /// since bisection can never converge on it.
    pub fn segment(
        &self,
        m: &Move,
        tolerance_squared: f64,
    ) -> Result<AdaptiveSegmentation, SegmentError> {
        if m.start == m.destination {
            return Err(SegmentError::DegenerateMove {
                position: m.destination,
            });
        }

        let mut partition = Partition {
            kinematics: &self.kinematics,
            tolerance_squared,
            max_depth: self.max_depth,
            trace: PartitionTrace::default(),
        };
        let waypoints = partition.split(m.start, m.destination, 1)?;
        let trace = partition.trace;

        Ok(AdaptiveSegmentation {
            result: SegmentationResult {
                waypoints,
                calculation_count: trace.distance_calculations * CALCULATIONS_PER_SPLIT,
            },
            trace,
        })
    }
}

struct Partition<'a, K> {
    kinematics: &'a K,
    tolerance_squared: f64,
    max_depth: u32,
    trace: PartitionTrace,
}

impl<K: Kinematics> Partition<'_, K> {
    fn split(
        &mut self,
        start: Vector,
        destination: Vector,
        depth: u32,
    ) -> Result<Vec<Vector>, KinematicsError> {
        let midpoint = start.lerp(destination, 0.5);
        let deviation = self.midpoint_deviation(start, midpoint, destination)?;

        // NaN never passes the tolerance test and falls through to the ceiling
        let within = deviation <= self.tolerance_squared;
        if within || depth >= self.max_depth {
            if !within {
                self.trace.truncated_branches += 1;
            }
            self.trace.max_depth = self.trace.max_depth.max(depth);
            return Ok(vec![start, destination]);
        }

        let left = self.split(start, midpoint, depth + 1)?;
        let right = self.split(midpoint, destination, depth + 1)?;
        Ok(merge(left, right))
    }

    fn midpoint_deviation(
        &mut self,
        start: Vector,
        midpoint: Vector,
        destination: Vector,
    ) -> Result<f64, KinematicsError> {
        self.trace.distance_calculations += 1;
        let start = self.kinematics.to_actuator_space(start)?;
        let destination = self.kinematics.to_actuator_space(destination)?;
        let midpoint = self.kinematics.to_actuator_space(midpoint)?;
        Ok(midpoint.squared_distance_from_line(start, destination))
    }
}
