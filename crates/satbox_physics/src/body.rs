//! Rigid body types

use crate::collider::ColliderKey;
use satbox_math::{Pose, Quat, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational indexing: if a body is removed and its slot reused, stale
    /// keys return None instead of aliasing the new occupant.
    pub struct BodyKey;
}

/// A rigid body with position, orientation, mass, and per-step motion state
///
/// A body with mass 0 is static (infinite effective mass): integration never
/// moves it, whatever velocity state it carries.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world space
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub orientation: Quat,
    /// Mass of the body; 0 marks the body as static
    pub mass: f32,
    /// Linear velocity (units per second)
    pub linear_velocity: Vec3,
    /// Angular velocity (radians per second, axis-scaled)
    pub angular_velocity: Vec3,
    /// Handles of the colliders attached to this body
    ///
    /// One body may carry several colliders (compound shape). The handles
    /// point into the world's collider arena.
    pub colliders: Vec<ColliderKey>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a dynamic body of mass 1 at the origin
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            mass: 1.0,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            colliders: Vec::new(),
        }
    }

    /// Create a static body (mass 0) at the given position
    pub fn new_static(position: Vec3) -> Self {
        Self {
            position,
            mass: 0.0,
            ..Self::new()
        }
    }

    /// Set the position of this body
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the orientation of this body
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the mass of this body (0 makes it static)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(0.0);
        self
    }

    /// Set the linear velocity of this body
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity of this body
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Update the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Update the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Update the mass; setting 0 transitions the body to static
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(0.0);
    }

    /// Whether this body is immovable (mass 0)
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// The body's world pose
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Advance position and orientation by one fixed timestep
    ///
    /// Static bodies are a no-op. Dynamic bodies integrate the current
    /// velocity state only; no forces are applied here. The orientation is
    /// renormalized after advancing to counter quaternion drift.
    pub fn update(&mut self, dt: f32) {
        if self.is_static() {
            return;
        }

        self.position += self.linear_velocity * dt;
        self.orientation = self.orientation.integrated(self.angular_velocity, dt);
    }
}
