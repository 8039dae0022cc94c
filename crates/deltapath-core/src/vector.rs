//! Four-axis points used on both sides of the kinematics transform.
//!
//! The first three components are Cartesian (or, after the transform,
//! the three arm lengths); `e` is the extrusion axis. Metric operations
//! only ever look at the first three components so that extrusion never
//! contributes to a travel distance.

use serde::Serialize;
use std::{
    fmt,
    ops::{Add, Mul, Sub},
};

/// Chord lengths below this are treated as a single point.
const ZERO_CHORD: f64 = 1e-18;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub e: f64,
}

impl Vector {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, e: f64) -> Self {
        Self { x, y, z, e }
    }

    pub fn is_finite(self) -> bool {
        [self.x, self.y, self.z, self.e].iter().all(|v| v.is_finite())
    }

    pub fn squared_magnitude(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(self) -> f64 {
        self.squared_magnitude().sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).magnitude()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cartesian cross product; the result carries no extrusion.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            0.0,
        )
    }

    /// Point at parameter `t` along the segment `self -> other`, all four axes.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Squared perpendicular distance from the infinite line through
    /// `start` and `end`.
    ///
    /// When the two line points coincide the line collapses to a point
    /// and the squared distance to `start` is returned instead of `NaN`.
    pub fn squared_distance_from_line(self, start: Self, end: Self) -> f64 {
        let chord = (end - start).squared_magnitude();
        if chord < ZERO_CHORD {
            return (self - start).squared_magnitude();
        }
        (self - start).cross(self - end).squared_magnitude() / chord
    }

    pub fn distance_from_line(self, start: Self, end: Self) -> f64 {
        self.squared_distance_from_line(start, end).sqrt()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(X{:.3} Y{:.3} Z{:.3} E{:.3})",
            self.x, self.y, self.z, self.e
        )
    }
}

impl From<[f64; 4]> for Vector {
    fn from([x, y, z, e]: [f64; 4]) -> Self {
        Self::new(x, y, z, e)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.e + rhs.e)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.e - rhs.e)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.e * rhs)
    }
}
