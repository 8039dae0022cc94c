// Worst-case deviation of a piecewise-linear path from the true kinematic path

use crate::{
    kinematics::{Kinematics, KinematicsError},
    vector::Vector,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Cartesian distance between dense samples in mm
    pub sample_step: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { sample_step: 0.01 }
    }
}

/// Measures how far the effector strays from its Cartesian line when a
/// controller interpolates linearly in actuator space between waypoints.
pub struct AccuracyEvaluator<K> {
    kinematics: K,
    sample_step: f64,
}

impl<K: Kinematics> AccuracyEvaluator<K> {
    pub fn new(kinematics: K, sample_step: f64) -> Self {
        Self {
            kinematics,
            sample_step,
        }
    }

    /// Largest perpendicular actuator-space distance, in mm, between the
    /// true path and the chord of the waypoint pair it belongs to.
    ///
    /// Each consecutive pair is sampled roughly every `sample_step` mm of
    /// Cartesian travel. Sequences shorter than two waypoints deviate by 0.
    pub fn worst_deviation(&self, waypoints: &[Vector]) -> Result<f64, KinematicsError> {
        let mut worst = 0.0f64;
        for pair in waypoints.windows(2) {
            worst = worst.max(self.pair_deviation(pair[0], pair[1])?);
        }
        Ok(worst)
    }

    fn pair_deviation(&self, a: Vector, b: Vector) -> Result<f64, KinematicsError> {
        let steps = ((a.distance(b) / self.sample_step).floor() as u64).max(1);
        if steps == 1 {
            return Ok(0.0);
        }

        let chord_start = self.kinematics.to_actuator_space(a)?;
        let chord_end = self.kinematics.to_actuator_space(b)?;
        let difference = b - a;

        let mut worst = 0.0f64;
        for s in 1..steps {
            let sample = a + difference * (s as f64 / steps as f64);
            let actuator = self.kinematics.to_actuator_space(sample)?;
            worst = worst.max(actuator.distance_from_line(chord_start, chord_end));
        }
        Ok(worst)
    }
}
