// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bramble_quad_tree::{Collidable, ObjectKey, QuadTree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

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
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
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

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[256usize, 1024, 4096] {
        let objects = gen_random_bodies(n, 12.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{}", n), |b| {
            b.iter_batched(
                || QuadTree::new(WORLD, 16.0),
                |mut tree| {
                    for i in 0..objects.len() {
                        tree.insert(&objects, ObjectKey::new(i));
                    }
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    for &n in &[1024usize, 4096] {
        let objects = gen_random_bodies(n, 12.0);
        let tree = build_tree(&objects);
        let mut rng = Rng::new(0xBADC_F00D_1234_5678);
        let points: Vec<Point> = (0..256)
            .map(|_| Point::new(rng.next_f64() * 2000.0, rng.next_f64() * 2000.0))
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("random_n{}", n), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                let mut hits = 0usize;
                for &p in &points {
                    out.clear();
                    tree.pick(&objects, p, |_| true, &mut out);
                    hits += out.len();
                }
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &n in &[1024usize, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        // Jitter every object a little each iteration, the common frame shape.
        group.bench_function(format!("jitter_n{}", n), |b| {
            b.iter_batched(
                || {
                    let objects = gen_random_bodies(n, 12.0);
                    let tree = build_tree(&objects);
                    (tree, objects, Rng::new(0xC1A5_7E55_9999_ABCD))
                },
                |(mut tree, mut objects, mut rng)| {
                    for o in &mut objects {
                        let dx = (rng.next_f64() - 0.5) * 4.0;
                        let dy = (rng.next_f64() - 0.5) * 4.0;
                        o.aabb = o.aabb + kurbo::Vec2::new(dx, dy);
                    }
                    tree.update_objects(&mut objects);
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_full_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_update");
    for &n in &[1024usize, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rebuild_n{}", n), |b| {
            b.iter_batched(
                || {
                    let objects = gen_random_bodies(n, 12.0);
                    let tree = build_tree(&objects);
                    (tree, objects)
                },
                |(mut tree, objects)| {
                    tree.full_update(&objects);
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_pick,
    bench_update,
    bench_full_update
);
criterion_main!(benches);
