// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Game configuration: canvas size, rock and character placement, animation pacing.

use crate::error::GameError;
use crate::side::Side;

/// Tunables for a game session.
///
/// [`Default`] reproduces the classic 800×600 layout. With the `serde` feature
/// the struct (de)serializes, and missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Canvas width; also the width of the root node's bounds.
    pub canvas_width: f64,
    /// Canvas height; also the height of the root node's bounds.
    pub canvas_height: f64,
    /// x of the rock (and character) on the left.
    pub on_left: f64,
    /// x of the rock (and character) on the right.
    pub on_right: f64,
    /// x of the upcoming rock when it is on the left.
    pub next_left: f64,
    /// x of the upcoming rock when it is on the right.
    pub next_right: f64,
    /// y of the character.
    pub character_y: f64,
    /// y of the rock the character stands on.
    pub on_rock_y: f64,
    /// y of the upcoming rock.
    pub next_rock_y: f64,
    /// Ticks per jump. `0` resolves every move synchronously inside
    /// [`Game::handle_direction`](crate::Game::handle_direction).
    pub frames_per_jump: u32,
    /// Peak height of the jump arc.
    pub jump_height: f64,
    /// How far the character sinks when it falls in.
    pub fall_depth: f64,
    /// Seed for the rock generator; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            on_left: 200.0,
            on_right: 600.0,
            next_left: 300.0,
            next_right: 500.0,
            character_y: 450.0,
            on_rock_y: 550.0,
            next_rock_y: 100.0,
            frames_per_jump: 12,
            jump_height: 80.0,
            fall_depth: 120.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Same configuration with synchronous (untimed) moves.
    #[must_use]
    pub fn instant(mut self) -> Self {
        self.frames_per_jump = 0;
        self
    }

    /// Same configuration with a fixed rock generator seed.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Horizontal distance the character covers when jumping across.
    pub fn jump_distance(&self) -> f64 {
        self.on_right - self.on_left
    }

    /// Horizontal distance between the two upcoming-rock slots.
    pub fn rock_distance(&self) -> f64 {
        self.next_right - self.next_left
    }

    /// x of the character and its rock on `side`.
    pub fn on_x(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.on_left,
            Side::Right => self.on_right,
        }
    }

    /// x of the upcoming rock on `side`.
    pub fn next_x(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.next_left,
            Side::Right => self.next_right,
        }
    }

    /// Check that positions are finite and ordered left to right.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GameError> {
        let finite = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("on_left", self.on_left),
            ("on_right", self.on_right),
            ("next_left", self.next_left),
            ("next_right", self.next_right),
            ("character_y", self.character_y),
            ("on_rock_y", self.on_rock_y),
            ("next_rock_y", self.next_rock_y),
            ("jump_height", self.jump_height),
            ("fall_depth", self.fall_depth),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GameError::InvalidConfig(*field));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(GameError::InvalidConfig("canvas size must be positive"));
        }
        if self.jump_distance() <= 0.0 {
            return Err(GameError::InvalidConfig("on_right must exceed on_left"));
        }
        if self.rock_distance() <= 0.0 {
            return Err(GameError::InvalidConfig("next_right must exceed next_left"));
        }
        Ok(())
    }
}
