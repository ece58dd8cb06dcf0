//! Contact manifolds
//!
//! The result record for a colliding pair. Manifolds are rebuilt from
//! scratch every tick and never warm-started.

use crate::collider::ColliderKey;
use satbox_math::Vec3;

/// A single contact point between two colliders
#[derive(Clone, Copy, Debug)]
pub struct ContactPoint {
    /// World-space contact position
    pub position: Vec3,
    /// Penetration depth along the manifold normal (always > 0)
    pub depth: f32,
}

impl ContactPoint {
    /// Create a new contact point
    pub fn new(position: Vec3, depth: f32) -> Self {
        Self { position, depth }
    }
}

/// The contact set for one colliding pair
///
/// Holds 1 to 4 points sharing a single unit normal, oriented from the
/// first collider of the pair toward the second.
#[derive(Clone, Debug)]
pub struct ContactManifold {
    /// The colliding pair, in pair-enumeration order
    pub pair: (ColliderKey, ColliderKey),
    /// Shared contact normal (unit length), pointing from pair.0 toward pair.1
    pub normal: Vec3,
    /// Contact points with per-point penetration depth
    pub points: Vec<ContactPoint>,
}

impl ContactManifold {
    /// Create a manifold for a pair
    pub fn new(pair: (ColliderKey, ColliderKey), normal: Vec3, points: Vec<ContactPoint>) -> Self {
        Self {
            pair,
            normal,
            points,
        }
    }

    /// The largest penetration depth among the manifold's points
    pub fn max_depth(&self) -> f32 {
        self.points.iter().fold(0.0, |acc, p| acc.max(p.depth))
    }
}
