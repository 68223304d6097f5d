// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Point, Rect};

use bramble_quad_tree::{Collidable, ObjectKey, QuadTree};

use crate::pass::CollisionPass;

/// A quadtree and its pass state bundled into one per-world engine.
///
/// [`BroadPhase::step`] is the whole per-frame protocol: reconcile moved
/// objects into the index, report colliding pairs, and occasionally rebuild
/// the tree from scratch so its shape tracks where objects are now rather
/// than where they have been.
pub struct BroadPhase<const BUCKET: usize = 16> {
    tree: QuadTree<BUCKET>,
    pass: CollisionPass,
    /// Steps between full rebuilds, `0` to never rebuild.
    rebuild_interval: u32,
    steps_since_rebuild: u32,
}

impl BroadPhase {
    /// Creates an engine over `bounds` with the default bucket capacity.
    ///
    /// See [`QuadTree::new`] for the meaning of `bounds` and
    /// `min_quadrant_size`. `rebuild_interval` is the number of [`Self::step`]
    /// calls between full index rebuilds; pass `0` to rely on incremental
    /// updates alone.
    pub fn new(bounds: Rect, min_quadrant_size: f64, rebuild_interval: u32) -> Self {
        Self::with_bucket(bounds, min_quadrant_size, rebuild_interval)
    }
}

impl<const BUCKET: usize> BroadPhase<BUCKET> {
    /// Creates an engine over `bounds` with bucket capacity `BUCKET`.
    pub fn with_bucket(bounds: Rect, min_quadrant_size: f64, rebuild_interval: u32) -> Self {
        Self {
            tree: QuadTree::with_bucket(bounds, min_quadrant_size),
            pass: CollisionPass::new(),
            rebuild_interval,
            steps_since_rebuild: 0,
        }
    }

    /// The underlying spatial index, for queries beyond what the engine
    /// forwards.
    pub fn tree(&self) -> &QuadTree<BUCKET> {
        &self.tree
    }

    /// Indexes `key` at its current AABB. See [`QuadTree::insert`].
    pub fn insert<O: Collidable>(&mut self, objects: &[O], key: ObjectKey) {
        self.tree.insert(objects, key);
    }

    /// Unindexes every stored copy of `key`. See [`QuadTree::remove`].
    pub fn remove(&mut self, key: ObjectKey) {
        self.tree.remove(key);
    }

    /// Re-indexes moved objects and saves current AABBs.
    /// See [`QuadTree::update_objects`].
    pub fn update_objects<O: Collidable>(&mut self, objects: &mut [O]) {
        self.tree.update_objects(objects);
    }

    /// Rebuilds the index from scratch and resets the rebuild countdown.
    /// See [`QuadTree::full_update`].
    pub fn full_update<O: Collidable>(&mut self, objects: &[O]) {
        self.tree.full_update(objects);
        self.steps_since_rebuild = 0;
    }

    /// Reports every colliding pair once. See [`CollisionPass::run`].
    pub fn collisions<O, F>(&mut self, objects: &mut [O], on_pair: F)
    where
        O: Collidable,
        F: FnMut(ObjectKey, ObjectKey, &mut O, &mut O),
    {
        self.pass.run(&self.tree, objects, on_pair);
    }

    /// Collects collidable objects containing `point` that pass `predicate`.
    /// See [`QuadTree::pick`].
    pub fn pick<O: Collidable>(
        &self,
        objects: &[O],
        point: Point,
        predicate: impl FnMut(&O) -> bool,
        out: &mut Vec<ObjectKey>,
    ) {
        self.tree.pick(objects, point, predicate, out);
    }

    /// Advances one frame: update moved objects, run the collision pass, and
    /// rebuild the index when the interval comes due.
    pub fn step<O, F>(&mut self, objects: &mut [O], on_pair: F)
    where
        O: Collidable,
        F: FnMut(ObjectKey, ObjectKey, &mut O, &mut O),
    {
        self.tree.update_objects(objects);
        self.pass.run(&self.tree, objects, on_pair);
        if self.rebuild_interval > 0 {
            self.steps_since_rebuild += 1;
            if self.steps_since_rebuild >= self.rebuild_interval {
                self.tree.full_update(objects);
                self.steps_since_rebuild = 0;
            }
        }
    }
}

impl<const BUCKET: usize> Debug for BroadPhase<BUCKET> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BroadPhase")
            .field("tree", &self.tree)
            .field("rebuild_interval", &self.rebuild_interval)
            .field("steps_since_rebuild", &self.steps_since_rebuild)
            .finish_non_exhaustive()
    }
}
