// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: object handles and the capability contract indexed objects satisfy.

use kurbo::Rect;

/// Non-owning handle for an indexed object.
///
/// A key is the position of the object in the caller's dense object slice;
/// the tree never owns objects and never observes their destruction. Removing
/// or dropping an object without first calling
/// [`QuadTree::remove`](crate::QuadTree::remove) on every tree that indexes it
/// leaves a dangling key behind — that contract belongs to the caller.
///
/// `Ord` on keys follows slice order and is the tie-break the collision pass
/// uses to report each unordered pair from exactly one side.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectKey(u32);

impl ObjectKey {
    /// Create a key for the object at `index` in the caller's object slice.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Object keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// The slice index this key refers to.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Capability contract an object must satisfy to be indexed.
///
/// The tree consumes a deliberately small surface: the current bounds, the
/// bounds as of the last [`save_aabb`](Collidable::save_aabb) (used to detect
/// motion deltas during incremental updates), and a soft-disable flag.
/// Everything else about the object — position, velocity, shape, rendering —
/// is owned elsewhere and never touched here.
pub trait Collidable {
    /// Current world-space bounding box.
    fn aabb(&self) -> Rect;

    /// Bounding box as of the last call to [`save_aabb`](Collidable::save_aabb).
    ///
    /// [`QuadTree::update_objects`](crate::QuadTree::update_objects) compares
    /// this against [`aabb`](Collidable::aabb) to decide which quadrants the
    /// object has left and which it has entered.
    fn saved_aabb(&self) -> Rect;

    /// Commit the current bounds as the new saved bounds.
    fn save_aabb(&mut self);

    /// Whether the object currently participates in collision and queries.
    ///
    /// Disabled objects are skipped during traversal but stay in the tree;
    /// flipping this flag is cheap and does not move anything.
    fn is_collidable(&self) -> bool;

    /// Narrow-phase refinement: does this object consider itself colliding
    /// with `other`, given that their AABBs already overlap?
    ///
    /// The broad phase only ever proposes AABB-overlapping pairs; implement
    /// this to reject pairs whose precise shapes do not touch. The default
    /// accepts every proposed pair.
    fn collides_with(&self, other: &Self) -> bool {
        let _ = other;
        true
    }
}
