//! Physics world and the fixed simulation step

use crate::body::{BodyKey, RigidBody};
use crate::broadphase::{Broadphase, ExhaustivePairs};
use crate::collider::{Collider, ColliderKey};
use crate::contact::ContactManifold;
use crate::narrowphase::detect_collision;
use satbox_math::Pose;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Fixed timestep in seconds; every step advances simulated time by
    /// exactly this much, independent of wall-clock frame time
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
        }
    }
}

impl PhysicsConfig {
    /// Create a config with the given fixed timestep
    pub fn new(timestep: f32) -> Self {
        Self { timestep }
    }
}

/// Counters from the most recent step
#[derive(Clone, Copy, Debug, Default)]
pub struct StepStats {
    /// Narrow-phase invocations this tick
    pub pair_tests: usize,
    /// Manifolds emitted this tick
    pub manifolds: usize,
}

/// The physics world: bodies, the collider arena, and the tick's contacts
///
/// An explicit context object; every operation goes through it and two
/// worlds never share state.
pub struct PhysicsWorld {
    /// All rigid bodies (generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Collider arena; bodies refer into it by key
    colliders: SlotMap<ColliderKey, Collider>,
    /// Collider keys in insertion order, the pair-enumeration order
    collider_order: Vec<ColliderKey>,
    /// Contact manifolds of the current tick, rebuilt every step
    manifolds: Vec<ContactManifold>,
    /// Candidate-pair producer; exhaustive all-pairs by default
    broadphase: Box<dyn Broadphase>,
    /// Physics configuration
    pub config: PhysicsConfig,
    last_stats: StepStats,
}

impl PhysicsWorld {
    /// Create a world with the default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a world with a custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            colliders: SlotMap::with_key(),
            collider_order: Vec::new(),
            manifolds: Vec::new(),
            broadphase: Box::new(ExhaustivePairs),
            config,
            last_stats: StepStats::default(),
        }
    }

    /// Replace the broadphase stage
    ///
    /// The narrow phase contract is unchanged: the broadphase only decides
    /// which pairs reach it.
    pub fn set_broadphase(&mut self, broadphase: Box<dyn Broadphase>) {
        self.broadphase = broadphase;
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body and its attached colliders
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let body = self.bodies.remove(key)?;
        for &collider_key in &body.colliders {
            self.colliders.remove(collider_key);
            self.collider_order.retain(|&k| k != collider_key);
        }
        Some(body)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Attach a collider to a body, establishing the back-reference
    ///
    /// The collider enters the arena and the pair-enumeration order. A body
    /// may carry several colliders (compound shape). Returns None if the
    /// body key is stale.
    pub fn attach_collider(&mut self, body: BodyKey, mut collider: Collider) -> Option<ColliderKey> {
        if !self.bodies.contains_key(body) {
            return None;
        }
        collider.body = body;
        let key = self.colliders.insert(collider);
        self.collider_order.push(key);
        self.bodies[body].colliders.push(key);
        Some(key)
    }

    /// Get an immutable reference to a collider by key
    pub fn get_collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    /// Number of colliders in the arena
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// A collider's current world pose, derived from its owning body
    pub fn collider_pose(&self, key: ColliderKey) -> Option<Pose> {
        let collider = self.colliders.get(key)?;
        let body = self.bodies.get(collider.body)?;
        Some(collider.world_pose(&body.pose()))
    }

    /// The current tick's contact manifolds, in pair-enumeration order
    pub fn manifolds(&self) -> &[ContactManifold] {
        &self.manifolds
    }

    /// Counters from the most recent step
    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Advance the simulation by one fixed timestep
    ///
    /// Order is fixed: integrate every body, discard the previous tick's
    /// manifolds, then test every candidate collider pair. The whole tick
    /// runs to completion before anything observes the new state.
    pub fn step(&mut self) {
        let dt = self.config.timestep;

        // Phase 1: integrate bodies. Static bodies (mass 0) never move.
        for (_key, body) in &mut self.bodies {
            body.update(dt);
        }

        // Phase 2: last tick's contacts are stale the moment bodies move
        self.manifolds.clear();
        let mut stats = StepStats::default();

        // Phase 3: narrow-phase test every candidate pair. The narrow phase
        // reads collider geometry only; the manifold list is the single
        // mutable output.
        for (key_a, key_b) in self.broadphase.candidate_pairs(&self.collider_order) {
            let (Some(a), Some(b)) = (self.colliders.get(key_a), self.colliders.get(key_b))
            else {
                continue;
            };
            if !a.filter.collides_with(&b.filter) {
                continue;
            }
            let (Some(body_a), Some(body_b)) =
                (self.bodies.get(a.body), self.bodies.get(b.body))
            else {
                continue;
            };

            let pose_a = a.world_pose(&body_a.pose());
            let pose_b = b.world_pose(&body_b.pose());

            stats.pair_tests += 1;
            if let Some(manifold) = detect_collision((key_a, key_b), a, &pose_a, b, &pose_b) {
                log::debug!(
                    "contact: {} point(s), depth {:.4}",
                    manifold.points.len(),
                    manifold.max_depth()
                );
                self.manifolds.push(manifold);
            }
        }

        stats.manifolds = self.manifolds.len();
        self.last_stats = stats;
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
