// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Quad Tree: a Kurbo-native dynamic region quadtree over AABBs.
//!
//! Bramble Quad Tree is the spatial index underneath a broad-phase collision
//! engine, and is useful standalone for point picks and region queries over
//! moving 2D objects.
//!
//! - Indexes objects by which quadrants their AABB overlaps; an object that
//!   straddles a boundary is stored in every quadrant it touches, and
//!   deduplicated on query.
//! - Updates incrementally: [`QuadTree::update_objects`] repositions only the
//!   objects whose AABB changed since the previous call, walking only the
//!   quadrants the old and new boxes overlap.
//! - Pools nodes: quadrants are materialized lazily on insertion, released
//!   when they empty out, and their slots reused.
//!
//! ## Object model
//!
//! The tree does not own objects. Callers keep objects in a dense slice and
//! the tree stores [`ObjectKey`]s into it. Objects expose their geometry
//! through the [`Collidable`] trait, which also carries the previous AABB the
//! incremental update diffs against, and an enabled flag that hides an object
//! from queries without unindexing it.
//!
//! ## What "overlaps" means
//!
//! Boxes are closed: sharing an edge or a corner counts as overlapping. The
//! predicate is exposed as [`aabb_overlaps`].
//!
//! ## Example
//!
//! ```
//! use bramble_quad_tree::{Collidable, ObjectKey, QuadTree};
//! use kurbo::{Point, Rect};
//!
//! struct Body {
//!     aabb: Rect,
//!     saved: Rect,
//! }
//!
//! impl Collidable for Body {
//!     fn aabb(&self) -> Rect {
//!         self.aabb
//!     }
//!     fn saved_aabb(&self) -> Rect {
//!         self.saved
//!     }
//!     fn save_aabb(&mut self) {
//!         self.saved = self.aabb;
//!     }
//!     fn is_collidable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let mut objects = vec![Body {
//!     aabb: Rect::new(0.0, 0.0, 10.0, 10.0),
//!     saved: Rect::new(0.0, 0.0, 10.0, 10.0),
//! }];
//! let mut tree = QuadTree::new(Rect::new(-1000.0, -1000.0, 1000.0, 1000.0), 8.0);
//! tree.insert(&objects, ObjectKey::new(0));
//!
//! let mut hit = Vec::new();
//! tree.pick(&objects, Point::new(5.0, 5.0), |_| true, &mut hit);
//! assert_eq!(hit, vec![ObjectKey::new(0)]);
//!
//! // Move the body and reconcile the index.
//! objects[0].aabb = Rect::new(500.0, 500.0, 510.0, 510.0);
//! tree.update_objects(&mut objects);
//!
//! let mut hit = Vec::new();
//! tree.pick(&objects, Point::new(505.0, 505.0), |_| true, &mut hit);
//! assert_eq!(hit, vec![ObjectKey::new(0)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;
mod util;

pub use tree::QuadTree;
pub use types::{Collidable, ObjectKey};
pub use util::aabb_overlaps;
