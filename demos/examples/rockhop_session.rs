// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted rock-hopping session drawn as ASCII art.
//!
//! The renderer listens on every node and repaints a character grid on each
//! change. Moves are driven tick by tick, the way a host timer would.
//!
//! Run:
//! - `cargo run -p rockhop_demos --example rockhop_session`
//! - `cargo run -p rockhop_demos --example rockhop_session -- config.toml RRLLR`
//!
//! The optional TOML file may set any `GameConfig` field, for example:
//!
//! ```toml
//! frames_per_jump = 4
//! seed = 7
//! ```
//!
//! Set `RUST_LOG=debug` to watch dropped input and move resolution.

use std::error::Error;
use std::rc::Rc;

use kurbo::{Point, Rect};
use rockhop_game::{Game, GameConfig, InputOutcome, SceneRenderer, Side, TickOutcome};
use rockhop_scene::{Color, RenderSurface, SceneListener, Transform};

const COLS: usize = 60;
const ROWS: usize = 24;

/// Rasterizes fills into a character grid, one glyph per color.
struct AsciiSurface {
    scale: (f64, f64),
    current: Transform,
    stack: Vec<Transform>,
    cells: Vec<char>,
}

impl AsciiSurface {
    fn new(width: f64, height: f64) -> Self {
        Self {
            scale: (COLS as f64 / width, ROWS as f64 / height),
            current: Transform::IDENTITY,
            stack: Vec::new(),
            cells: vec![' '; COLS * ROWS],
        }
    }

    fn glyph(color: Color) -> char {
        match (color.r, color.g, color.b) {
            (121, 85, 72) => '@',
            (174, 182, 191) => '#',
            (128, 139, 150) => '=',
            _ => '*',
        }
    }

    fn to_cell(&self, pt: Point) -> (f64, f64) {
        (pt.x * self.scale.0, pt.y * self.scale.1)
    }

    fn frame(&self) -> String {
        let mut out = String::with_capacity((COLS + 3) * (ROWS + 2));
        let border = format!("+{}+\n", "-".repeat(COLS));
        out.push_str(&border);
        for row in self.cells.chunks(COLS) {
            out.push('|');
            out.extend(row);
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }
}

impl RenderSurface for AsciiSurface {
    fn clear(&mut self, _region: Rect) {
        self.cells.fill(' ');
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.current = t;
        }
    }

    fn transform(&mut self, transform: Transform) {
        self.current = self.current.concatenate(transform);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
        ]
        .map(|p| self.to_cell(self.current.map_point(p)));
        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in corners {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        let glyph = Self::glyph(color);
        let clamp = |v: f64, max: usize| (v.max(0.0) as usize).min(max);
        for row in clamp(y0.round(), ROWS)..clamp(y1.round(), ROWS) {
            for col in clamp(x0.round(), COLS)..clamp(x1.round(), COLS) {
                self.cells[row * COLS + col] = glyph;
            }
        }
    }
}

fn load_config(path: Option<&str>) -> Result<GameConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(GameConfig::default().seeded(7));
    };
    let text = std::fs::read_to_string(path)?;
    let config: GameConfig = toml::from_str(&text)?;
    log::info!("loaded configuration from {path}");
    Ok(config)
}

fn parse_script(script: &str) -> Vec<Side> {
    script
        .chars()
        .filter_map(|c| match c.to_ascii_uppercase() {
            'L' => Some(Side::Left),
            'R' => Some(Side::Right),
            other => {
                log::warn!("ignoring script character {other:?}");
                None
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let script = parse_script(args.get(1).map_or("RRLLRL", String::as_str));

    let renderer = Rc::new(SceneRenderer::new(
        AsciiSurface::new(config.canvas_width, config.canvas_height),
        Rect::new(0.0, 0.0, config.canvas_width, config.canvas_height),
    ));
    let mut game = Game::new(config)?;
    let listener: Rc<dyn SceneListener> = renderer.clone();
    game.attach_listener(&listener)?;
    renderer.repaint(game.scene());
    renderer.with_surface(|s| print!("{}", s.frame()));

    for direction in script {
        let state = game.state();
        println!(
            "standing {:?}, next rock {:?}, pressing {direction:?}",
            state.side, state.next_rock
        );
        let landing = match game.handle_direction(direction)? {
            InputOutcome::Resolved(landing) => landing,
            InputOutcome::Started { token, .. } => {
                // A second press mid-move is dropped by the busy guard.
                assert_eq!(game.handle_direction(direction)?, InputOutcome::Dropped);
                loop {
                    match game.tick(token)? {
                        TickOutcome::Advanced { .. } => {}
                        TickOutcome::Finished(landing) => break landing,
                        other => return Err(format!("move ended early: {other:?}").into()),
                    }
                }
            }
            InputOutcome::Dropped => continue,
        };
        renderer.with_surface(|s| print!("{}", s.frame()));
        println!(
            "{:?}: now on {:?}, next rock {:?} ({} repaints so far)\n",
            landing.movement,
            landing.side,
            landing.next_rock,
            renderer.repaints()
        );
    }
    Ok(())
}
