// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree picking.
//!
//! Index a few boxes, dump the quadrant structure, and pick objects under a
//! point.
//!
//! Run:
//! - `cargo run -p bramble_demos --example quad_tree_pick`

use bramble_quad_tree::{Collidable, ObjectKey, QuadTree};
use kurbo::{Point, Rect};

struct Box2D {
    aabb: Rect,
    saved: Rect,
    pickable: bool,
}

impl Box2D {
    fn new(aabb: Rect, pickable: bool) -> Self {
        Self {
            aabb,
            saved: aabb,
            pickable,
        }
    }
}

impl Collidable for Box2D {
    fn aabb(&self) -> Rect {
        self.aabb
    }
    fn saved_aabb(&self) -> Rect {
        self.saved
    }
    fn save_aabb(&mut self) {
        self.saved = self.aabb;
    }
    fn is_collidable(&self) -> bool {
        self.pickable
    }
}

fn main() {
    let boxes = vec![
        Box2D::new(Rect::new(10.0, 10.0, 60.0, 60.0), true),
        Box2D::new(Rect::new(40.0, 40.0, 120.0, 120.0), true),
        Box2D::new(Rect::new(45.0, 45.0, 55.0, 55.0), false),
        Box2D::new(Rect::new(300.0, 300.0, 350.0, 350.0), true),
    ];

    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 400.0, 400.0), 8.0);
    for i in 0..boxes.len() {
        tree.insert(&boxes, ObjectKey::new(i));
    }

    println!("tree: {tree:?}");
    println!("quadrants:");
    tree.visit_quadrants(|q| println!("  {q:?}"));

    // The unpickable box sits right under this point but is filtered out.
    let mut hits = Vec::new();
    tree.pick(&boxes, Point::new(50.0, 50.0), |_| true, &mut hits);
    println!("picked at (50, 50): {hits:?}");
    assert_eq!(hits, vec![ObjectKey::new(0), ObjectKey::new(1)]);
}
