// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::types::{Collidable, ObjectKey};
use crate::util::{aabb_overlaps, child_quadrants, min_side};

/// Slot index of the root node. The root is created at construction and is
/// never freed.
const ROOT: usize = 0;

/// A node of the quadtree.
///
/// Nodes live in the tree's slot vector and refer to each other by index.
/// A node is "split" when at least one child slot is occupied; split nodes
/// keep their bucket empty and route insertions into children instead.
struct Node {
    /// Slot of the parent node, `None` for the root.
    parent: Option<usize>,
    /// The region of space this node covers.
    quadrant: Rect,
    /// Precomputed bounds of the four child quadrants, whether or not the
    /// corresponding child node exists yet.
    child_bounds: [Rect; 4],
    /// Slots of the child nodes, allocated lazily on first insertion.
    children: [Option<usize>; 4],
    /// Keys stored directly on this node.
    bucket: SmallVec<[ObjectKey; 8]>,
}

impl Node {
    fn new(parent: Option<usize>, quadrant: Rect) -> Self {
        Self {
            parent,
            quadrant,
            child_bounds: child_quadrants(quadrant),
            children: [None; 4],
            bucket: SmallVec::new(),
        }
    }

    fn is_split(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }
}

/// A dynamic region quadtree over axis-aligned bounding boxes.
///
/// The tree does not own the objects it indexes. Objects live in a dense
/// slice owned by the caller, and the tree stores [`ObjectKey`]s, which are
/// indices into that slice. Every operation that needs object geometry takes
/// the slice as an argument; it is the caller's responsibility to pass the
/// same slice (or one with the same layout) across calls.
///
/// An object is stored in every leaf whose quadrant its AABB overlaps, so an
/// object straddling a quadrant boundary appears in several buckets at once.
/// Queries that report objects deduplicate; the raw traversals do not.
///
/// Leaves hold up to `BUCKET` keys before splitting. A leaf whose shorter
/// side is not strictly larger than the minimum quadrant size never splits,
/// so buckets at the size floor can exceed `BUCKET`.
pub struct QuadTree<const BUCKET: usize = 16> {
    /// Node pool. Slot 0 is always the live root; freed slots are `None` and
    /// recorded in `free_list`.
    nodes: Vec<Option<Node>>,
    /// Slots available for reuse.
    free_list: Vec<usize>,
    /// Leaves whose shorter side is at or below this never split.
    min_quadrant_size: f64,
    /// Stamp for the current rebuild pass; `rebuild_marks[i]` equal to this
    /// means object `i` has already been collected.
    rebuild_stamp: u32,
    rebuild_marks: Vec<u32>,
}

impl QuadTree {
    /// Creates a tree covering `bounds` with the default bucket capacity.
    ///
    /// Objects whose AABB lies entirely outside `bounds` are silently
    /// unindexed: insertions of such objects store nothing and queries never
    /// find them. `min_quadrant_size` must be positive; leaves whose shorter
    /// side is at or below it never split.
    pub fn new(bounds: Rect, min_quadrant_size: f64) -> Self {
        Self::with_bucket(bounds, min_quadrant_size)
    }
}

impl<const BUCKET: usize> QuadTree<BUCKET> {
    /// Creates a tree covering `bounds` with bucket capacity `BUCKET`.
    pub fn with_bucket(bounds: Rect, min_quadrant_size: f64) -> Self {
        debug_assert!(
            min_quadrant_size > 0.0,
            "minimum quadrant size must be positive"
        );
        let mut nodes = Vec::with_capacity(16);
        nodes.push(Some(Node::new(None, bounds)));
        Self {
            nodes,
            free_list: Vec::new(),
            min_quadrant_size,
            rebuild_stamp: 0,
            rebuild_marks: Vec::new(),
        }
    }

    /// The region of space this tree covers.
    pub fn bounds(&self) -> Rect {
        self.node(ROOT).quadrant
    }

    /// The size floor below which leaves stop splitting.
    pub fn min_quadrant_size(&self) -> f64 {
        self.min_quadrant_size
    }

    fn node(&self, n: usize) -> &Node {
        self.nodes[n].as_ref().expect("dangling node index")
    }

    fn node_mut(&mut self, n: usize) -> &mut Node {
        self.nodes[n].as_mut().expect("dangling node index")
    }

    /// Returns the child of `n` in quadrant `q`, allocating it if absent.
    fn child_or_create(&mut self, n: usize, q: usize) -> usize {
        if let Some(c) = self.node(n).children[q] {
            return c;
        }
        let bounds = self.node(n).child_bounds[q];
        let child = Node::new(Some(n), bounds);
        let slot = match self.free_list.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(child);
                slot
            }
            None => {
                self.nodes.push(Some(child));
                self.nodes.len() - 1
            }
        };
        self.node_mut(n).children[q] = Some(slot);
        slot
    }

    /// Inserts `key` into the tree. The object's current AABB decides which
    /// quadrants it lands in; an object outside the tree's bounds is not
    /// stored anywhere. Inserting a key that is already present in a bucket
    /// is a no-op for that bucket.
    pub fn insert<O: Collidable>(&mut self, objects: &[O], key: ObjectKey) {
        let aabb = objects[key.index()].aabb();
        self.add_object(ROOT, objects, key, aabb);
    }

    fn add_object<O: Collidable>(
        &mut self,
        n: usize,
        objects: &[O],
        key: ObjectKey,
        aabb: Rect,
    ) {
        if !aabb_overlaps(self.node(n).quadrant, aabb) {
            return;
        }
        if self.node(n).is_split() {
            self.route_into_children(n, objects, key, aabb);
            return;
        }
        {
            let node = self.node_mut(n);
            if node.bucket.contains(&key) {
                return;
            }
            node.bucket.push(key);
        }
        let node = self.node(n);
        if node.bucket.len() > BUCKET && min_side(node.quadrant) > self.min_quadrant_size {
            let spilled = core::mem::take(&mut self.node_mut(n).bucket);
            for k in spilled {
                let k_aabb = objects[k.index()].aabb();
                self.route_into_children(n, objects, k, k_aabb);
            }
        }
    }

    fn route_into_children<O: Collidable>(
        &mut self,
        n: usize,
        objects: &[O],
        key: ObjectKey,
        aabb: Rect,
    ) {
        let child_bounds = self.node(n).child_bounds;
        for (q, bounds) in child_bounds.iter().enumerate() {
            if aabb_overlaps(*bounds, aabb) {
                let child = self.child_or_create(n, q);
                self.add_object(child, objects, key, aabb);
            }
        }
    }

    /// Removes every stored copy of `key`, then reclaims any nodes left
    /// empty. Works regardless of where the object has moved since it was
    /// inserted, at the cost of a full traversal.
    pub fn remove(&mut self, key: ObjectKey) {
        self.remove_all(ROOT, key);
    }

    fn remove_all(&mut self, n: usize, key: ObjectKey) {
        {
            let node = self.node_mut(n);
            if let Some(pos) = node.bucket.iter().position(|&k| k == key) {
                node.bucket.swap_remove(pos);
            }
        }
        let children = self.node(n).children;
        for child in children.into_iter().flatten() {
            self.remove_all(child, key);
        }
        self.release_if_empty(n);
    }

    /// Removes `key` from the subtree at `n`, visiting only quadrants that
    /// `aabb` overlaps. Correct only if `aabb` covers everywhere the key is
    /// actually stored.
    fn remove_within(&mut self, n: usize, key: ObjectKey, aabb: Rect) {
        if !aabb_overlaps(self.node(n).quadrant, aabb) {
            return;
        }
        {
            let node = self.node_mut(n);
            if let Some(pos) = node.bucket.iter().position(|&k| k == key) {
                node.bucket.swap_remove(pos);
            }
        }
        let children = self.node(n).children;
        for child in children.into_iter().flatten() {
            self.remove_within(child, key, aabb);
        }
        self.release_if_empty(n);
    }

    /// Frees `n` if it holds nothing and has no children, then walks up
    /// releasing ancestors that became empty in turn. The root is never
    /// freed.
    fn release_if_empty(&mut self, n: usize) {
        if n == ROOT {
            return;
        }
        let Some(node) = self.nodes[n].as_ref() else {
            return;
        };
        if !node.bucket.is_empty() || node.is_split() {
            return;
        }
        let parent = node.parent.expect("non-root node without a parent");
        self.nodes[n] = None;
        self.free_list.push(n);
        for child in &mut self.node_mut(parent).children {
            if *child == Some(n) {
                *child = None;
            }
        }
        self.release_if_empty(parent);
    }

    /// Re-indexes every object whose AABB changed since its last save, then
    /// saves the current AABB of every object.
    ///
    /// This is the per-frame maintenance call: objects that did not move cost
    /// a single comparison, and moved objects are repositioned by walking
    /// only the quadrants their old and new boxes overlap.
    pub fn update_objects<O: Collidable>(&mut self, objects: &mut [O]) {
        for i in 0..objects.len() {
            let old = objects[i].saved_aabb();
            let new = objects[i].aabb();
            if old != new {
                self.update_object(ROOT, &*objects, ObjectKey::new(i), old, new);
            }
        }
        for o in objects.iter_mut() {
            o.save_aabb();
        }
    }

    fn update_object<O: Collidable>(
        &mut self,
        n: usize,
        objects: &[O],
        key: ObjectKey,
        old: Rect,
        new: Rect,
    ) {
        let quadrant = self.node(n).quadrant;
        let overlapped = aabb_overlaps(quadrant, old);
        let overlapping = aabb_overlaps(quadrant, new);
        match (overlapped, overlapping) {
            (false, false) => {}
            (true, false) => self.remove_within(n, key, old),
            (false, true) => self.add_object(n, objects, key, new),
            (true, true) => {
                if !self.node(n).is_split() {
                    return;
                }
                let children = self.node(n).children;
                let child_bounds = self.node(n).child_bounds;
                // Create and fill missing children first. Once the key sits
                // in a live child, the removals below can never free `n` out
                // from under the loop.
                for q in 0..4 {
                    if children[q].is_none() && aabb_overlaps(child_bounds[q], new) {
                        let c = self.child_or_create(n, q);
                        self.add_object(c, objects, key, new);
                    }
                }
                for c in children.into_iter().flatten() {
                    self.update_object(c, objects, key, old, new);
                }
                self.release_if_empty(n);
            }
        }
    }

    /// Tears the tree down and reinserts every indexed object from scratch.
    ///
    /// Incremental updates preserve correctness but can leave the tree shaped
    /// by where objects used to be; an occasional rebuild restores the shape
    /// a fresh bulk load would produce. Disabled objects stay indexed.
    pub fn full_update<O: Collidable>(&mut self, objects: &[O]) {
        self.rebuild_stamp = self.rebuild_stamp.wrapping_add(1);
        if self.rebuild_stamp == 0 {
            self.rebuild_stamp = 1;
        }
        let stamp = self.rebuild_stamp;
        let mut marks = core::mem::take(&mut self.rebuild_marks);
        if marks.len() < objects.len() {
            marks.resize(objects.len(), 0);
        }

        let mut survivors: Vec<ObjectKey> = Vec::new();
        self.visit_objects(|key| {
            let i = key.index();
            if marks[i] != stamp {
                marks[i] = stamp;
                survivors.push(key);
            }
        });
        self.rebuild_marks = marks;

        self.nodes.truncate(1);
        self.free_list.clear();
        let root = self.node_mut(ROOT);
        root.children = [None; 4];
        root.bucket.clear();

        for key in survivors {
            let aabb = objects[key.index()].aabb();
            self.add_object(ROOT, objects, key, aabb);
        }
    }

    /// Visits every key reachable from quadrants overlapping `query`, until
    /// the callback breaks.
    ///
    /// This is the raw traversal: keys of objects stored in several
    /// overlapping quadrants are yielded once per quadrant, and disabled
    /// objects are yielded too. Callers that want each matching object
    /// exactly once should use [`Self::visit`] instead.
    pub fn visit_until(
        &self,
        query: Rect,
        mut f: impl FnMut(ObjectKey) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        self.visit_node_until(ROOT, query, &mut f)
    }

    fn visit_node_until(
        &self,
        n: usize,
        query: Rect,
        f: &mut impl FnMut(ObjectKey) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some(node) = self.nodes[n].as_ref() else {
            return ControlFlow::Continue(());
        };
        if !aabb_overlaps(node.quadrant, query) {
            return ControlFlow::Continue(());
        }
        for &key in &node.bucket {
            f(key)?;
        }
        for child in node.children.into_iter().flatten() {
            self.visit_node_until(child, query, f)?;
        }
        ControlFlow::Continue(())
    }

    /// Calls `f` once for every collidable object whose AABB overlaps
    /// `query`.
    pub fn visit<O: Collidable>(&self, objects: &[O], query: Rect, mut f: impl FnMut(ObjectKey)) {
        let mut seen: Vec<ObjectKey> = Vec::new();
        let _ = self.visit_until(query, |key| {
            let o = &objects[key.index()];
            if o.is_collidable() && aabb_overlaps(o.aabb(), query) && !seen.contains(&key) {
                seen.push(key);
                f(key);
            }
            ControlFlow::Continue(())
        });
    }

    /// Calls `f` for every key stored anywhere in the tree, duplicates
    /// included.
    pub fn visit_objects(&self, mut f: impl FnMut(ObjectKey)) {
        self.visit_objects_in(ROOT, &mut f);
    }

    fn visit_objects_in(&self, n: usize, f: &mut impl FnMut(ObjectKey)) {
        let Some(node) = self.nodes[n].as_ref() else {
            return;
        };
        for &key in &node.bucket {
            f(key);
        }
        for child in node.children.into_iter().flatten() {
            self.visit_objects_in(child, f);
        }
    }

    /// Calls `f` with the bounds of every live node. Useful for drawing the
    /// tree structure.
    pub fn visit_quadrants(&self, mut f: impl FnMut(Rect)) {
        for node in self.nodes.iter().flatten() {
            f(node.quadrant);
        }
    }

    /// Collects the keys of collidable objects containing `point` that pass
    /// `predicate`, in traversal order. Each matching object appears once.
    pub fn pick<O: Collidable>(
        &self,
        objects: &[O],
        point: Point,
        mut predicate: impl FnMut(&O) -> bool,
        out: &mut Vec<ObjectKey>,
    ) {
        let probe = Rect::new(point.x, point.y, point.x, point.y);
        let _ = self.visit_until(probe, |key| {
            let o = &objects[key.index()];
            if o.is_collidable()
                && aabb_overlaps(o.aabb(), probe)
                && !out.contains(&key)
                && predicate(o)
            {
                out.push(key);
            }
            ControlFlow::Continue(())
        });
    }

    /// Depth of the tree. A lone root is depth 1.
    pub fn depth(&self) -> usize {
        self.depth_of(ROOT)
    }

    fn depth_of(&self, n: usize) -> usize {
        let node = self.node(n);
        1 + node
            .children
            .into_iter()
            .flatten()
            .map(|c| self.depth_of(c))
            .max()
            .unwrap_or(0)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }
}

impl<const BUCKET: usize> Debug for QuadTree<BUCKET> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.bounds())
            .field("min_quadrant_size", &self.min_quadrant_size)
            .field("nodes_alive", &self.node_count())
            .field("nodes_total", &self.nodes.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}
