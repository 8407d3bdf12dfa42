// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use rockhop_game::{Game, GameConfig, InputOutcome, SceneRenderer, Side, TickOutcome};
use rockhop_scene::{RecordingSurface, SceneListener};

fn play_move(game: &mut Game, direction: Side) {
    match game.handle_direction(direction).unwrap() {
        InputOutcome::Started { token, .. } => {
            while let TickOutcome::Advanced { .. } = game.tick(token).unwrap() {}
        }
        InputOutcome::Resolved(landing) => {
            black_box(landing);
        }
        InputOutcome::Dropped => {}
    }
}

/// Follow the upcoming rock for `moves` moves.
fn play(game: &mut Game, moves: usize) {
    for _ in 0..moves {
        let next = game.state().next_rock;
        play_move(game, next);
    }
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    for &frames in &[0u32, 12] {
        group.bench_function(format!("hundred_moves_f{frames}"), |b| {
            b.iter_batched(
                || {
                    let config = GameConfig {
                        frames_per_jump: frames,
                        ..GameConfig::default()
                    };
                    Game::new(config.seeded(0x5EED)).unwrap()
                },
                |mut game| play(&mut game, 100),
                BatchSize::SmallInput,
            );
        });
    }
    group.bench_function("hundred_moves_f12_rendered", |b| {
        b.iter_batched(
            || {
                let mut game = Game::new(GameConfig::default().seeded(0x5EED)).unwrap();
                let renderer = Rc::new(SceneRenderer::new(
                    RecordingSurface::new(),
                    Rect::new(0.0, 0.0, 800.0, 600.0),
                ));
                let listener: Rc<dyn SceneListener> = renderer;
                game.attach_listener(&listener).unwrap();
                game
            },
            |mut game| play(&mut game, 100),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
