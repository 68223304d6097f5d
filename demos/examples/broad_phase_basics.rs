// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase basics.
//!
//! Simulate a handful of drifting balls, step the engine each frame, and
//! print the colliding pairs as they happen.
//!
//! Run:
//! - `cargo run -p bramble_demos --example broad_phase_basics`

use bramble_broad_phase::BroadPhase;
use bramble_quad_tree::{Collidable, ObjectKey};
use kurbo::{Rect, Vec2};

struct Ball {
    aabb: Rect,
    saved: Rect,
    velocity: Vec2,
}

impl Ball {
    fn new(x: f64, y: f64, velocity: Vec2) -> Self {
        let aabb = Rect::new(x, y, x + 10.0, y + 10.0);
        Self {
            aabb,
            saved: aabb,
            velocity,
        }
    }
}

impl Collidable for Ball {
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
        true
    }
}

fn main() {
    let world = Rect::new(0.0, 0.0, 400.0, 400.0);
    let mut balls = vec![
        Ball::new(20.0, 100.0, Vec2::new(6.0, 0.0)),
        Ball::new(370.0, 102.0, Vec2::new(-6.0, 0.0)),
        Ball::new(200.0, 20.0, Vec2::new(0.0, 5.0)),
        Ball::new(198.0, 380.0, Vec2::new(0.0, -5.0)),
    ];

    // Rebuild the index every 60 frames to keep its shape tracking the balls.
    let mut phase = BroadPhase::new(world, 8.0, 60);
    for i in 0..balls.len() {
        phase.insert(&balls, ObjectKey::new(i));
    }

    for frame in 0..60 {
        for ball in &mut balls {
            ball.aabb = ball.aabb + ball.velocity;
        }

        let mut contacts = Vec::new();
        phase.step(&mut balls, |a, b, ball_a, ball_b| {
            // Elastic-ish response: swap velocities.
            core::mem::swap(&mut ball_a.velocity, &mut ball_b.velocity);
            contacts.push((a, b));
        });

        for (a, b) in contacts {
            println!("frame {frame:2}: {a:?} hit {b:?}");
        }
    }

    println!("index after 60 frames: {:?}", phase.tree());
}
