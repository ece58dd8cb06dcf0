//! Rigid transform (position + orientation)
//!
//! A Pose places local-space geometry into world space. Colliders compose
//! their fixed local pose with their owning body's pose each query.

use crate::{Quat, Vec3};

/// A rigid transform with position and orientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (no translation or rotation)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }

    /// Create a pose with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Create a pose with position and orientation
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Transform a point from local space to world space
    ///
    /// Applies rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.orientation.rotate(p) + self.position
    }

    /// Transform a direction from local space to world space
    ///
    /// Applies rotation only.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.orientation.rotate(d)
    }

    /// Compute the inverse pose
    ///
    /// `pose.inverse().transform_point(pose.transform_point(p)) == p`
    pub fn inverse(&self) -> Self {
        let inv_orientation = self.orientation.conjugate();
        Self {
            position: inv_orientation.rotate(-self.position),
            orientation: inv_orientation,
        }
    }

    /// Compose two poses: result = self * other
    ///
    /// The composed pose applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(other.position),
            orientation: self.orientation * other.orientation,
        }
    }
}
