// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Broad Phase: collision pair detection over a dynamic quadtree.
//!
//! This crate pairs [`bramble_quad_tree`] with a pass that reports every
//! colliding pair of objects exactly once per frame.
//!
//! - [`CollisionPass`]: the pass itself. Walks each object, queries the tree
//!   for overlapping partners, and deduplicates with generation stamps so a
//!   pair stored in several quadrants still comes out once.
//! - [`BroadPhase`]: tree plus pass bundled into a per-world engine with a
//!   single [`BroadPhase::step`] call per frame and an optional periodic
//!   full rebuild of the index.
//!
//! Pairs are reported with mutable access to both objects, so collision
//! response can run inside the callback. An object that stops being
//! collidable mid-pass stops producing and receiving pairs immediately.
//!
//! ## Example
//!
//! ```
//! use bramble_broad_phase::BroadPhase;
//! use bramble_quad_tree::{Collidable, ObjectKey};
//! use kurbo::Rect;
//!
//! struct Ball {
//!     aabb: Rect,
//!     saved: Rect,
//!     hits: u32,
//! }
//!
//! impl Collidable for Ball {
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
//! let mut balls = vec![
//!     Ball { aabb: Rect::new(0.0, 0.0, 10.0, 10.0), saved: Rect::ZERO, hits: 0 },
//!     Ball { aabb: Rect::new(5.0, 5.0, 15.0, 15.0), saved: Rect::ZERO, hits: 0 },
//! ];
//! for b in &mut balls {
//!     b.save_aabb();
//! }
//!
//! let mut phase = BroadPhase::new(Rect::new(-100.0, -100.0, 100.0, 100.0), 1.0, 0);
//! for i in 0..balls.len() {
//!     phase.insert(&balls, ObjectKey::new(i));
//! }
//!
//! phase.step(&mut balls, |_, _, a, b| {
//!     a.hits += 1;
//!     b.hits += 1;
//! });
//! assert_eq!(balls[0].hits, 1);
//! assert_eq!(balls[1].hits, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod pass;
mod phase;

pub use pass::CollisionPass;
pub use phase::BroadPhase;
