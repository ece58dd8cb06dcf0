//! Rigid-body simulation core for satbox
//!
//! This crate provides the hard core of the test harness:
//! - Convex hull colliders (vertices, faces, edges) with validated construction
//! - Narrow-phase collision detection (separating axis test + manifold clipping)
//! - Rigid bodies with fixed-timestep integration
//! - The per-tick simulation step over all collider pairs

pub mod body;
pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod hull;
pub mod narrowphase;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody};
pub use broadphase::{Broadphase, ExhaustivePairs};
pub use collider::{Collider, ColliderKey, CollisionFilter, CollisionLayer, Shape, ShapeKind};
pub use contact::{ContactManifold, ContactPoint};
pub use hull::{ConvexHull, Face, HullError};
pub use narrowphase::detect_collision;
pub use world::{PhysicsConfig, PhysicsWorld, StepStats};
