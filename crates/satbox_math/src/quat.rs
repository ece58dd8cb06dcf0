//! Unit quaternion for 3D rotations
//!
//! Orientations are stored as unit quaternions and composed by the Hamilton
//! product. Integrating angular velocity adds a non-unit increment, so
//! callers renormalize after advancing an orientation.

use bytemuck::{Pod, Zeroable};
use crate::Vec3;

/// A quaternion with vector part (x, y, z) and scalar part w
///
/// Q = w + x*i + y*j + z*k
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Scalar component
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a rotation of `angle` radians about `axis`
    ///
    /// The axis is normalized internally. A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let sin_h = half.sin();
        Self {
            x: axis.x * sin_h,
            y: axis.y * sin_h,
            z: axis.z * sin_h,
            w: half.cos(),
        }
    }

    /// Create a pure quaternion (zero scalar part) from a vector
    ///
    /// Used when integrating angular velocity: dq = 0.5 * pure(w) * q * dt.
    #[inline]
    pub fn pure(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Compute the squared magnitude
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Compute the magnitude
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit magnitude
    ///
    /// A zero quaternion normalizes to the identity.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            let inv = 1.0 / mag;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate (negated vector part)
    ///
    /// For unit quaternions this is the inverse rotation.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotate a vector by this quaternion
    ///
    /// Expects a unit quaternion. Uses the expanded form of q * v * q^-1.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }

    /// Advance this orientation by an angular velocity over a timestep
    ///
    /// q' = normalize(q + 0.5 * dt * pure(omega) * q). The increment is not
    /// a unit quaternion, so the result is renormalized to counter drift.
    pub fn integrated(&self, angular_velocity: Vec3, dt: f32) -> Self {
        let dq = Self::pure(angular_velocity) * *self;
        (*self + dq * (0.5 * dt)).normalized()
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    /// Hamilton product: the combined rotation applies `rhs` first, then `self`
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl std::ops::Add for Quat {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl std::ops::Mul<f32> for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar, self.w * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Quat::IDENTITY.rotate(v), v));
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let q = Quat::from_axis_angle(Vec3::Z, PI / 2.0);
        let rotated = q.rotate(Vec3::X);
        assert!(vec_approx_eq(rotated, Vec3::Y));
    }

    #[test]
    fn test_half_turn_about_y() {
        let q = Quat::from_axis_angle(Vec3::Y, PI);
        let rotated = q.rotate(Vec3::X);
        assert!(vec_approx_eq(rotated, -Vec3::X));
    }

    #[test]
    fn test_axis_angle_is_unit() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.7);
        assert!((q.magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_axis_yields_identity() {
        let q = Quat::from_axis_angle(Vec3::ZERO, 1.0);
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(0.3, 1.0, -0.5), 1.2);
        let v = Vec3::new(4.0, -2.0, 1.0);
        let back = q.conjugate().rotate(q.rotate(v));
        assert!(vec_approx_eq(back, v));
    }

    #[test]
    fn test_composition_order() {
        // (a * b) applies b first, then a
        let a = Quat::from_axis_angle(Vec3::Z, PI / 2.0);
        let b = Quat::from_axis_angle(Vec3::X, PI / 2.0);
        let composed = a * b;
        let v = Vec3::Y;
        let expected = a.rotate(b.rotate(v));
        assert!(vec_approx_eq(composed.rotate(v), expected));
    }

    #[test]
    fn test_integrated_matches_axis_angle() {
        // Integrating omega = (0, 0, w) for small dt approximates a rotation
        // of w*dt about Z
        let omega = Vec3::new(0.0, 0.0, 1.0);
        let dt = 0.001;
        let mut q = Quat::IDENTITY;
        for _ in 0..1000 {
            q = q.integrated(omega, dt);
        }
        let expected = Quat::from_axis_angle(Vec3::Z, 1.0);
        let rotated = q.rotate(Vec3::X);
        let expected_v = expected.rotate(Vec3::X);
        assert!((rotated - expected_v).length() < 0.01);
    }

    #[test]
    fn test_integrated_stays_unit() {
        let mut q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.4);
        for _ in 0..10_000 {
            q = q.integrated(Vec3::new(0.5, -0.2, 0.9), 1.0 / 60.0);
        }
        assert!((q.magnitude() - 1.0).abs() < EPSILON);
    }
}
