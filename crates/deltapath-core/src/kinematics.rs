// Kinematics transforms from Cartesian space into actuator space

use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod delta;

pub use delta::{DeltaGeometry, DeltaKin};

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum KinematicsError {
    #[error("position {position} is outside the reachable dome of tower {tower}")]
    Unreachable { position: Vector, tower: usize },
}

/// How Cartesian parameters and tower lengths map onto vector axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisMapping {
    /// Every axis parameter updates its own axis and every tower fills its
    /// own actuator component.
    #[default]
    Independent,
    /// Historical analyzer behavior: Y and Z parameters land on X, tower 1
    /// is overwritten by tower 2, and the Y actuator component stays zero.
    Legacy,
}

/// Maps a Cartesian position onto actuator space.
pub trait Kinematics {
    fn to_actuator_space(&self, p: Vector) -> Result<Vector, KinematicsError>;
}

impl<K: Kinematics + ?Sized> Kinematics for &K {
    fn to_actuator_space(&self, p: Vector) -> Result<Vector, KinematicsError> {
        (**self).to_actuator_space(p)
    }
}
