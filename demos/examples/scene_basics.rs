// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph basics.
//!
//! Build a small tree, move and rotate nodes, listen for changes, paint into a
//! recording surface, and hit-test through the registry.
//!
//! Run:
//! - `cargo run -p rockhop_demos --example scene_basics`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;
use rockhop_scene::{
    Color, DrawCommand, HitRegistry, LocalNode, Paint, RecordingSurface, SceneGraph,
    SceneListener,
};

/// Counts notifications.
#[derive(Default)]
struct Counter(Cell<usize>);

impl SceneListener for Counter {
    fn update(&self, _scene: &SceneGraph) {
        self.0.set(self.0.get() + 1);
    }
}

fn main() {
    let mut scene = SceneGraph::new("scene", LocalNode::with_bounds(0.0, 0.0, 400.0, 300.0));
    let root = scene.root();
    let arm = scene
        .insert(root, "arm", LocalNode::with_bounds(0.0, -5.0, 100.0, 10.0))
        .unwrap();
    let hand = scene
        .insert(
            arm,
            "hand",
            LocalNode::with_bounds(-10.0, -10.0, 20.0, 20.0)
                .pickable()
                .paint(Paint::Fill(Color::rgb(200, 80, 40))),
        )
        .unwrap();
    let target = scene
        .insert(
            root,
            "target",
            LocalNode::with_bounds(-20.0, -20.0, 40.0, 40.0)
                .pickable()
                .paint(Paint::Fill(Color::rgb(40, 120, 200))),
        )
        .unwrap();

    let counter = Rc::new(Counter::default());
    scene.add_listener(arm, counter.clone()).unwrap();

    // Place the arm, then swing it a quarter turn about its own origin.
    scene.translate(arm, 200.0, 150.0).unwrap();
    scene.translate(hand, 100.0, 0.0).unwrap();
    scene
        .rotate(arm, core::f64::consts::FRAC_PI_2, 0.0, 0.0)
        .unwrap();
    scene.translate(target, 200.0, 250.0).unwrap();
    println!("arm listener fired {} times", counter.0.get());

    let hand_at = scene.global_transform(hand).unwrap().map_point(Point::ORIGIN);
    println!("hand origin in root space: {hand_at:?}");
    println!("hand world bounds: {:?}", scene.world_bounds(hand).unwrap());

    // The hand now overlaps the target; registration order decides the winner.
    let mut registry = HitRegistry::new();
    registry.register(target);
    registry.register(hand);
    let probe = Point::new(200.0, 245.0);
    if let Some(hit) = registry.find_hit(&scene, probe) {
        let names: Vec<_> = hit.path.iter().filter_map(|&n| scene.name(n)).collect();
        println!("hit at {probe:?}: {}", names.join(" > "));
    }

    let mut surface = RecordingSurface::new();
    scene.render(&mut surface);
    for command in surface.commands() {
        if let DrawCommand::Fill {
            rect,
            transform,
            color,
        } = command
        {
            println!(
                "fill {rect:?} with {color:?} at {:?}",
                transform.coeffs()
            );
        }
    }

    // Detach the hand: it stops painting and picking, and rejects transforms.
    scene.remove_child(arm, hand);
    println!(
        "hand detached: {}, translate -> {:?}",
        scene.is_detached(hand),
        scene.translate(hand, 1.0, 1.0)
    );
}
