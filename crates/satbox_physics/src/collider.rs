//! Colliders and collision filtering
//!
//! A collider binds a local-space shape to an owning body and derives its
//! world pose from the body's pose each query. Colliders live in an arena in
//! the physics world and are addressed by generational keys; bodies hold
//! keys, never pointers.

use bitflags::bitflags;

use crate::body::BodyKey;
use crate::hull::ConvexHull;
use satbox_math::Pose;
use slotmap::new_key_type;

new_key_type! {
    /// Key to a collider in the world's collider arena
    pub struct ColliderKey;
}

/// The closed set of collision shape variants
///
/// Pair tests dispatch on [`ShapeKind`] pairs, so adding a variant means
/// adding dispatch arms, not touching the step loop.
#[derive(Clone, Debug)]
pub enum Shape {
    Hull(ConvexHull),
}

/// Discriminant of [`Shape`], used to key pair dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Hull,
}

impl Shape {
    /// The kind tag of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Hull(_) => ShapeKind::Hull,
        }
    }

    /// The hull payload, if this shape is a hull
    pub fn as_hull(&self) -> Option<&ConvexHull> {
        match self {
            Shape::Hull(hull) => Some(hull),
        }
    }
}

bitflags! {
    /// Collision layers for filtering which colliders are pair-tested
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most colliders
        const DEFAULT = 1 << 0;
        /// Static world geometry (floors, walls)
        const STATIC = 1 << 1;
        /// Debug/probe colliders
        const PROBE = 1 << 2;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining which pairs reach the narrow phase
///
/// Two colliders are tested if each one's layer intersects the other's mask.
/// The default filter collides with everything, which preserves the
/// exhaustive all-pairs semantics unless a scene opts out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this collider belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this collider is tested against
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    /// Create a filter with the given layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Whether a pair with `other` should be narrow-phase tested
    ///
    /// Both filters must agree.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }
}

/// A shape bound to a body with a fixed local offset
///
/// The back-reference to the owning body is a handle set when the collider
/// is attached; it is only ever used to look the body's pose up, never to
/// mutate the body.
#[derive(Clone, Debug)]
pub struct Collider {
    /// The collision shape in local space
    pub shape: Shape,
    /// Fixed offset from the owning body's frame (identity if none)
    pub local_pose: Pose,
    /// Handle of the owning body, set by the world on attach
    pub body: BodyKey,
    /// Which pairs this collider participates in
    pub filter: CollisionFilter,
}

impl Collider {
    /// Create a collider with an identity local offset
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            local_pose: Pose::identity(),
            body: BodyKey::default(),
            filter: CollisionFilter::default(),
        }
    }

    /// Create a hull collider with an identity local offset
    pub fn hull(hull: ConvexHull) -> Self {
        Self::new(Shape::Hull(hull))
    }

    /// Set the fixed local offset from the body frame
    pub fn with_local_pose(mut self, local_pose: Pose) -> Self {
        self.local_pose = local_pose;
        self
    }

    /// Set the collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Derive the world pose from the owning body's current pose
    ///
    /// Recomputed per query; nothing is stored, so the collider can never
    /// drift out of sync with its body.
    #[inline]
    pub fn world_pose(&self, body_pose: &Pose) -> Pose {
        body_pose.compose(&self.local_pose)
    }
}
