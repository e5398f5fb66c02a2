//! 3D vector math and point-to-line projection.

use crate::error::{RealignError, RealignResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Directions shorter than this are treated as degenerate.
pub const DIRECTION_EPSILON: f64 = 1e-12;

/// A 3D displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Unit vector in the same direction, or `None` for a degenerate vector.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if !len.is_finite() || len < DIRECTION_EPSILON {
            return None;
        }
        Some(self * (1.0 / len))
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// A 3D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(self, other: Point3) -> f64 {
        (self - other).length()
    }

    pub fn approx_eq(self, other: Point3, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: Vec3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Vec3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;

    fn sub(self, rhs: Point3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Parses `"x,y,z"` (whitespace around components is ignored).
impl FromStr for Point3 {
    type Err = RealignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(RealignError::InvalidGeometry(format!(
                "expected three comma-separated coordinates, got '{}'",
                s
            )));
        }
        let mut coords = [0.0; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.parse::<f64>().map_err(|e| {
                RealignError::InvalidGeometry(format!("bad coordinate '{}': {}", part, e))
            })?;
        }
        let point = Point3::new(coords[0], coords[1], coords[2]);
        if !point.is_finite() {
            return Err(RealignError::InvalidGeometry(format!(
                "coordinates must be finite, got '{}'",
                s
            )));
        }
        Ok(point)
    }
}

/// An unbounded line through `origin` along a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point3,
    direction: Vec3,
}

impl Line {
    /// Create a line, normalizing `direction`.
    ///
    /// Fails with [`RealignError::InvalidGeometry`] when the direction is
    /// zero-length or not finite.
    pub fn new(origin: Point3, direction: Vec3) -> RealignResult<Self> {
        if !origin.is_finite() {
            return Err(RealignError::InvalidGeometry(format!(
                "line origin {} is not finite",
                origin
            )));
        }
        let direction = direction.normalized().ok_or_else(|| {
            RealignError::InvalidGeometry(format!(
                "line direction ({}, {}, {}) is degenerate",
                direction.x, direction.y, direction.z
            ))
        })?;
        Ok(Self { origin, direction })
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at signed distance `t` from the origin.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Signed distance along the line of the foot of the perpendicular from `point`.
    pub fn parameter_of(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.direction)
    }

    /// Perpendicular distance from `point` to the line.
    pub fn distance_to(&self, point: Point3) -> f64 {
        point.distance_to(project_point_onto_line(point, self))
    }
}

/// Closest point on the unbounded `line` to `point`.
pub fn project_point_onto_line(point: Point3, line: &Line) -> Point3 {
    line.at(line.parameter_of(point))
}

/// Euclidean distance.
pub fn distance(a: Point3, b: Point3) -> f64 {
    a.distance_to(b)
}
