//! Spawn-relative coordinate frame arithmetic.
//!
//! Waypoints are shared between worlds whose absolute coordinate spaces can
//! differ wildly in size, so positions are compared relative to each world's
//! spawn point. The frame shift is plain component-wise vector arithmetic;
//! callers decide whether the vertical component of the origin participates
//! (it usually does not, see [`Vec3::without_y`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A 3D position or offset in world coordinates.
///
/// Equality is exact floating-point equality. The dedup predicate relies on
/// this: waypoint coordinates are user-placed and typically integer-snapped,
/// so exact comparison identifies "the same point" without a distance
/// threshold that could falsely merge distinct nearby markers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// East/west component
    pub x: f64,
    /// Vertical component
    pub y: f64,
    /// North/south component
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a position from its components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Copy of this position with the vertical component zeroed.
    ///
    /// Spawn origins are flattened before frame shifts: vertical spawn
    /// offset is not meaningful for waypoint comparison or display.
    pub fn without_y(self) -> Self {
        Self { y: 0.0, ..self }
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

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Re-express an absolute position relative to `origin`.
pub fn normalize(position: Vec3, origin: Vec3) -> Vec3 {
    position - origin
}

/// Inverse of [`normalize`]: restore an absolute position from a relative one.
pub fn denormalize(relative: Vec3, origin: Vec3) -> Vec3 {
    relative + origin
}
