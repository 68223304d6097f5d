// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bramble_broad_phase::{BroadPhase, CollisionPass};
use bramble_quad_tree::{Collidable, ObjectKey, QuadTree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;

const WORLD: Rect = Rect::new(0.0, 0.0, 2000.0, 2000.0);

struct Body {
    aabb: Rect,
    saved: Rect,
}

impl Body {
    fn new(aabb: Rect) -> Self {
        Self { aabb, saved: aabb }
    }
}

impl Collidable for Body {
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

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_bodies(count: usize, size: f64) -> Vec<Body> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    for _ in 0..count {
        let x0 = rng.next_f64() * (WORLD.width() - size);
        let y0 = rng.next_f64() * (WORLD.height() - size);
        out.push(Body::new(Rect::new(x0, y0, x0 + size, y0 + size)));
    }
    out
}

fn build_tree(objects: &[Body]) -> QuadTree {
    let mut tree = QuadTree::new(WORLD, 16.0);
    for i in 0..objects.len() {
        tree.insert(objects, ObjectKey::new(i));
    }
    tree
}

fn bench_collision_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_pass");
    // Larger bodies mean denser pair counts for the same population.
    for &(n, size) in &[(1024usize, 12.0), (4096, 12.0), (1024, 48.0)] {
        let mut objects = gen_random_bodies(n, size);
        let tree = build_tree(&objects);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("run_n{}_s{}", n, size), |b| {
            let mut pass = CollisionPass::new();
            b.iter(|| {
                let mut pairs = 0usize;
                pass.run(&tree, &mut objects, |_, _, _, _| pairs += 1);
                black_box(pairs);
            })
        });
    }
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for &n in &[1024usize, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("jitter_n{}", n), |b| {
            b.iter_batched(
                || {
                    let objects = gen_random_bodies(n, 12.0);
                    let mut phase = BroadPhase::new(WORLD, 16.0, 0);
                    for i in 0..objects.len() {
                        phase.insert(&objects, ObjectKey::new(i));
                    }
                    (phase, objects, Rng::new(0xBADC_F00D_1234_5678))
                },
                |(mut phase, mut objects, mut rng)| {
                    for o in &mut objects {
                        let dx = (rng.next_f64() - 0.5) * 4.0;
                        let dy = (rng.next_f64() - 0.5) * 4.0;
                        o.aabb = o.aabb + kurbo::Vec2::new(dx, dy);
                    }
                    let mut pairs = 0usize;
                    phase.step(&mut objects, |_, _, _, _| pairs += 1);
                    black_box(pairs);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_collision_pass, bench_step);
criterion_main!(benches);
