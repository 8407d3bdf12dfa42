// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rockhop Game: a rock-hopping game driven through a [`rockhop_scene`] scene graph.
//!
//! A character stands on one of two rocks. Each directional input either
//! jumps toward the upcoming rock or, when the rock is on the other side,
//! falls in and is carried back out by a recovery queue.
//!
//! ## Moves
//!
//! [`Game::handle_direction`] classifies the input against the [`GameState`]:
//!
//! - Upcoming rock in that direction, character on the other side: jump across.
//!   The character arcs over and the rock it stands on slides with it.
//! - Upcoming rock in that direction, character already there: jump up in place.
//! - Upcoming rock on the other side: fall in. The side the character stands on
//!   is pushed onto that direction's recovery queue and the front of the queue
//!   is where the character climbs out.
//!
//! After a jump the next rock comes from the landing side's recovery queue if
//! it has entries, otherwise from a fair coin.
//!
//! ## Animation
//!
//! Moves animate over [`GameConfig::frames_per_jump`] ticks. Starting a move
//! hands back an [`AnimationToken`]; the host's timer passes it to
//! [`Game::tick`]. Input arriving while a move is in flight is dropped. With
//! `frames_per_jump == 0` moves resolve inside `handle_direction`.
//!
//! ## Rendering
//!
//! [`SceneRenderer`] is a [`SceneListener`](rockhop_scene::SceneListener) that
//! clears and repaints its surface on every notification. Attach it to every
//! node with [`Game::attach_listener`].
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::Rect;
//! use rockhop_game::{Game, GameConfig, InputOutcome, SceneRenderer, Side, TickOutcome};
//! use rockhop_scene::{RecordingSurface, SceneListener};
//!
//! let mut game = Game::new(GameConfig::default().seeded(42)).unwrap();
//! let renderer = Rc::new(SceneRenderer::new(
//!     RecordingSurface::new(),
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//! ));
//! let listener: Rc<dyn SceneListener> = renderer.clone();
//! game.attach_listener(&listener).unwrap();
//!
//! let InputOutcome::Started { token, .. } = game.handle_direction(Side::Right).unwrap() else {
//!     unreachable!("the default config animates");
//! };
//! while let TickOutcome::Advanced { .. } = game.tick(token).unwrap() {}
//!
//! assert_eq!(game.state().side, Side::Right);
//! assert!(renderer.repaints() > 0);
//! ```

mod animation;
mod config;
mod error;
mod fall_queue;
mod game;
mod model;
mod side;
mod state;
mod view;

pub use animation::{Animation, AnimationToken, Animator, Frame, Poll, Step};
pub use config::GameConfig;
pub use error::GameError;
pub use fall_queue::{FALL_QUEUE_CAPACITY, FallQueue};
pub use game::{Game, InputOutcome, Landing, TickOutcome};
pub use model::{NodeKind, RockScene};
pub use side::Side;
pub use state::{Activity, GameState, Move};
pub use view::SceneRenderer;
