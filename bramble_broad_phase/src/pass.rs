// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use bramble_quad_tree::{Collidable, ObjectKey, QuadTree, aabb_overlaps};

/// Reusable state for running broad-phase passes over a [`QuadTree`].
///
/// A pass walks every object, queries the tree for everything overlapping its
/// AABB, and reports each colliding pair exactly once per call to
/// [`CollisionPass::run`], even though the tree stores straddling objects in
/// several quadrants.
///
/// Deduplication is stamp-based: the pass keeps one `u32` per object slot and
/// a counter that advances for every candidate, so reporting a pair costs no
/// lookup structure and no clearing between candidates or between passes.
pub struct CollisionPass {
    /// `stamps[i]` equal to `stamp` means object `i` was already reported
    /// against the current candidate.
    stamps: Vec<u32>,
    stamp: u32,
}

impl CollisionPass {
    /// Creates pass state. One instance can be reused across frames and
    /// across trees.
    pub fn new() -> Self {
        Self {
            stamps: Vec::new(),
            stamp: 0,
        }
    }

    /// Runs one broad-phase pass, calling `on_pair` for every colliding pair.
    ///
    /// A pair is reported when both objects are collidable, their AABBs
    /// overlap, and the candidate's [`Collidable::collides_with`] accepts the
    /// other object. Pairs come out in candidate order with `a < b`, each
    /// exactly once.
    ///
    /// `on_pair` gets mutable access to both objects. If it clears the
    /// candidate's collidable flag, the candidate stops producing pairs
    /// immediately; objects disabled mid-pass are likewise skipped as
    /// partners for every later candidate.
    pub fn run<O, F, const BUCKET: usize>(
        &mut self,
        tree: &QuadTree<BUCKET>,
        objects: &mut [O],
        mut on_pair: F,
    ) where
        O: Collidable,
        F: FnMut(ObjectKey, ObjectKey, &mut O, &mut O),
    {
        if self.stamps.len() < objects.len() {
            self.stamps.resize(objects.len(), 0);
        }

        for c in 0..objects.len() {
            if !objects[c].is_collidable() {
                continue;
            }
            self.stamp = self.stamp.wrapping_add(1);
            if self.stamp == 0 {
                self.stamp = 1;
            }
            let stamp = self.stamp;
            let stamps = &mut self.stamps;
            let query = objects[c].aabb();

            let _ = tree.visit_until(query, |key| {
                let h = key.index();
                // Each unordered pair is owned by its lower-keyed member.
                if h <= c {
                    return ControlFlow::Continue(());
                }
                if !objects[h].is_collidable() || !aabb_overlaps(objects[h].aabb(), query) {
                    return ControlFlow::Continue(());
                }
                if stamps[h] == stamp {
                    return ControlFlow::Continue(());
                }
                stamps[h] = stamp;

                // h > c, so the split point separates the two cleanly.
                let (head, tail) = objects.split_at_mut(h);
                let candidate = &mut head[c];
                let other = &mut tail[0];
                if candidate.collides_with(other) {
                    on_pair(ObjectKey::new(c), key, candidate, other);
                }
                if !objects[c].is_collidable() {
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            });
        }
    }
}

impl Default for CollisionPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for CollisionPass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CollisionPass")
            .field("tracked", &self.stamps.len())
            .field("stamp", &self.stamp)
            .finish_non_exhaustive()
    }
}
