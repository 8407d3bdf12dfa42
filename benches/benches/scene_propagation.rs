// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use rockhop_scene::{HitRegistry, LocalNode, NodeId, RecordingSurface, SceneGraph};

fn box_node() -> LocalNode {
    LocalNode::with_bounds(-5.0, -5.0, 10.0, 10.0).pickable()
}

/// A single chain `root -> n1 -> ... -> n_depth`, each offset by one unit.
fn gen_chain(depth: usize) -> (SceneGraph, Vec<NodeId>) {
    let mut scene = SceneGraph::new("root", LocalNode::default());
    let mut ids = Vec::with_capacity(depth);
    let mut parent = scene.root();
    for i in 0..depth {
        let id = scene.insert(parent, format!("n{i}"), box_node()).unwrap();
        scene.translate(id, 1.0, 0.0).unwrap();
        ids.push(id);
        parent = id;
    }
    (scene, ids)
}

/// A root with `rows * cols` leaf children laid out on a grid.
fn gen_grid(rows: usize, cols: usize, cell: f64) -> (SceneGraph, Vec<NodeId>) {
    let mut scene = SceneGraph::new("root", LocalNode::default());
    let root = scene.root();
    let mut ids = Vec::with_capacity(rows * cols);
    for y in 0..rows {
        for x in 0..cols {
            let id = scene.insert(root, format!("c{x}_{y}"), box_node()).unwrap();
            scene
                .translate(id, x as f64 * cell, y as f64 * cell)
                .unwrap();
            ids.push(id);
        }
    }
    (scene, ids)
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");
    for &depth in &[16usize, 128, 1024] {
        let (mut scene, ids) = gen_chain(depth);
        let top = ids[0];
        let bottom = ids[depth - 1];
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("translate_chain_top_d{depth}"), |b| {
            b.iter(|| {
                scene.translate(top, 0.5, 0.0).unwrap();
                black_box(scene.global_transform(bottom));
            });
        });
    }
    let (mut scene, ids) = gen_grid(32, 32, 12.0);
    group.bench_function("translate_root_grid_32x32", |b| {
        let root = scene.root();
        b.iter(|| {
            scene.translate(root, 0.25, 0.0).unwrap();
            black_box(scene.global_transform(ids[ids.len() / 2]));
        });
    });
    group.finish();
}

fn bench_hit_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_scan");
    for &n in &[8usize, 32, 64] {
        let (mut scene, ids) = gen_grid(n, n, 12.0);
        let root = scene.root();
        scene.rotate(root, 0.1, 0.0, 0.0).unwrap();
        let mut registry = HitRegistry::new();
        for &id in &ids {
            registry.register(id);
        }
        // Worst case: the last registered node, then a miss.
        let last = scene.global_transform(*ids.last().unwrap()).unwrap();
        let hit_pt = last.map_point(Point::ORIGIN);
        let miss_pt = Point::new(-1000.0, -1000.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("find_hit_last_n{n}"), |b| {
            b.iter(|| black_box(registry.find_hit(&scene, black_box(hit_pt))));
        });
        group.bench_function(format!("find_hit_miss_n{n}"), |b| {
            b.iter(|| black_box(registry.find_hit(&scene, black_box(miss_pt))));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let (scene, ids) = gen_grid(32, 32, 12.0);
    group.throughput(Throughput::Elements(ids.len() as u64));
    group.bench_function("record_grid_32x32", |b| {
        b.iter_batched(
            RecordingSurface::new,
            |mut surface| {
                scene.render(&mut surface);
                black_box(surface.commands().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_propagation, bench_hit_scan, bench_render);
criterion_main!(benches);
