//! Broadphase candidate-pair producers
//!
//! The step loop asks a broadphase for candidate collider pairs before
//! narrow-phase testing. Implementations must yield a superset of the truly
//! overlapping pairs, with no self-pairs and no duplicates. The default is
//! exhaustive enumeration; a spatial pruning stage slots in here without the
//! narrow phase or the step loop changing.

use crate::collider::ColliderKey;

/// A source of candidate collider pairs for narrow-phase testing
pub trait Broadphase {
    /// Yield candidate pairs from the collider set, in deterministic order
    ///
    /// `colliders` is the world's collider key list in insertion order. Every
    /// yielded pair must be unordered-unique: (i, j) with i before j, never
    /// (j, i) as well, and never (i, i).
    fn candidate_pairs<'a>(
        &'a self,
        colliders: &'a [ColliderKey],
    ) -> Box<dyn Iterator<Item = (ColliderKey, ColliderKey)> + 'a>;
}

/// The exhaustive all-pairs broadphase: every unordered pair, N(N-1)/2 total
///
/// No spatial pruning. This is the correctness baseline; it scales
/// quadratically with the collider count.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExhaustivePairs;

impl Broadphase for ExhaustivePairs {
    fn candidate_pairs<'a>(
        &'a self,
        colliders: &'a [ColliderKey],
    ) -> Box<dyn Iterator<Item = (ColliderKey, ColliderKey)> + 'a> {
        Box::new((0..colliders.len()).flat_map(move |i| {
            (i + 1..colliders.len()).map(move |j| (colliders[i], colliders[j]))
        }))
    }
}
