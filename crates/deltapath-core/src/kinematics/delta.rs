// Delta kinematics

use crate::{
    kinematics::{AxisMapping, Kinematics, KinematicsError},
    vector::Vector,
};
use serde::{Deserialize, Serialize};

const SIN_60: f64 = 0.8660254037844386;
const COS_60: f64 = 0.5;

/// Physical dimensions of a delta printer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaGeometry {
    /// Diagonal rod length in mm
    pub diagonal_rod: f64,
    /// Offset between the endstops and the print surface in mm
    pub zero_offset: f64,
    /// Horizontal distance from the center to each tower in mm
    pub radius: f64,
    pub axis_mapping: AxisMapping,
}

impl Default for DeltaGeometry {
    fn default() -> Self {
        Self {
            diagonal_rod: 250.0,
            zero_offset: -9.0,
            radius: 175.0 - 33.0 - 18.0,
            axis_mapping: AxisMapping::Independent,
        }
    }
}

impl DeltaGeometry {
    /// Tower XY positions, laid out at 120° around the center.
    pub fn towers(&self) -> [(f64, f64); 3] {
        let r = self.radius;
        [(-SIN_60 * r, -COS_60 * r), (SIN_60 * r, -COS_60 * r), (0.0, r)]
    }
}

/// Delta kinematics - three vertical towers with arms to effector
#[derive(Debug, Clone)]
pub struct DeltaKin {
    arm2: f64,
    zero_offset: f64,
    towers: [(f64, f64); 3],
    mapping: AxisMapping,
}

impl DeltaKin {
    pub fn new(geometry: &DeltaGeometry) -> Self {
        Self {
            arm2: geometry.diagonal_rod * geometry.diagonal_rod,
            zero_offset: geometry.zero_offset,
            towers: geometry.towers(),
            mapping: geometry.axis_mapping,
        }
    }

    /// Carriage height of one tower for the given effector position.
    ///
    /// `tower` is zero based; errors report it one based.
    fn tower_height(&self, tower: usize, p: Vector) -> Result<f64, KinematicsError> {
        let (tower_x, tower_y) = self.towers[tower];
        let dx = tower_x - p.x;
        let dy = tower_y - p.y;
        let radicand = self.arm2 - dx * dx - dy * dy;
        if radicand < 0.0 {
            return Err(KinematicsError::Unreachable {
                position: p,
                tower: tower + 1,
            });
        }
        Ok(radicand.sqrt() + self.zero_offset + p.z)
    }
}

impl Default for DeltaKin {
    fn default() -> Self {
        Self::new(&DeltaGeometry::default())
    }
}

impl Kinematics for DeltaKin {
    fn to_actuator_space(&self, p: Vector) -> Result<Vector, KinematicsError> {
        match self.mapping {
            AxisMapping::Independent => Ok(Vector::new(
                self.tower_height(0, p)?,
                self.tower_height(1, p)?,
                self.tower_height(2, p)?,
                p.e,
            )),
            // tower 1 lands in x and is immediately overwritten by tower 2
            AxisMapping::Legacy => Ok(Vector::new(
                self.tower_height(1, p)?,
                0.0,
                self.tower_height(2, p)?,
                p.e,
            )),
        }
    }
}
