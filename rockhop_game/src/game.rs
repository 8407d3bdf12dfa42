// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controller: turns directional input and timer ticks into scene changes.

use std::rc::Rc;

use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rockhop_scene::{SceneGraph, SceneListener};

use crate::animation::{Animation, AnimationToken, Animator, Poll, Step};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::model::{NodeKind, RockScene};
use crate::side::Side;
use crate::state::{Activity, GameState, Move};

/// How a move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landing {
    /// The move that was played.
    pub movement: Move,
    /// Side the character ended on.
    pub side: Side,
    /// Side of the new upcoming rock.
    pub next_rock: Side,
}

/// Result of [`Game::handle_direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// A move was already in flight; nothing changed.
    Dropped,
    /// The move started animating. Drive it with [`Game::tick`] and `token`.
    Started {
        /// The move being played.
        movement: Move,
        /// Token for this move's ticks.
        token: AnimationToken,
    },
    /// The move resolved synchronously (`frames_per_jump == 0`).
    Resolved(Landing),
}

/// Result of [`Game::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No animation is running.
    Idle,
    /// The token belongs to an animation that was replaced or fast-forwarded.
    Stale,
    /// One frame was applied.
    Advanced {
        /// Frames left.
        remaining: usize,
    },
    /// The last frame was applied and the move resolved.
    Finished(Landing),
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    movement: Move,
    landing: Side,
}

/// A rock-hopping session: configuration, state, scene, and the running animation.
///
/// Input is serialized: while a move is in flight further directions are
/// dropped. The host calls [`tick`](Self::tick) from its timer with the token
/// returned when the move started.
#[derive(Debug)]
pub struct Game<R = StdRng> {
    config: GameConfig,
    state: GameState,
    model: RockScene,
    animator: Animator,
    pending: Option<Pending>,
    rng: R,
}

impl Game<StdRng> {
    /// Start a session. The rock generator uses `config.seed`, or OS entropy when unset.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] if `config` fails [validation](GameConfig::validate).
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Game<R> {
    /// Start a session from the initial state with a caller-supplied generator.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] if `config` fails [validation](GameConfig::validate).
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
        Self::with_state(config, GameState::default(), rng)
    }

    /// Start a session from `state`, placing the nodes accordingly.
    ///
    /// The session always starts idle.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] if `config` fails [validation](GameConfig::validate).
    pub fn with_state(config: GameConfig, mut state: GameState, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        state.activity = Activity::Idle;
        let model = RockScene::build(&config, &state)?;
        Ok(Self {
            config,
            state,
            model,
            animator: Animator::new(),
            pending: None,
            rng,
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The assembled scene.
    pub fn model(&self) -> &RockScene {
        &self.model
    }

    /// The scene graph.
    pub fn scene(&self) -> &SceneGraph {
        self.model.scene()
    }

    /// Returns true while a move is in flight.
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Register `listener` on every node of the scene.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors.
    pub fn attach_listener(&mut self, listener: &Rc<dyn SceneListener>) -> Result<(), GameError> {
        self.model.add_listener_everywhere(listener)
    }

    /// Unregister `listener` from every node. Returns false if it was never attached.
    pub fn detach_listener(&mut self, listener: &Rc<dyn SceneListener>) -> bool {
        self.model.remove_listener_everywhere(listener)
    }

    /// Kind of the first interactive node under a root-space point.
    pub fn find_hit(&self, pt: Point) -> Option<NodeKind> {
        self.model.find_hit(pt).map(|(kind, _)| kind)
    }

    /// React to a directional input.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors; none occur for the game's own scene. On
    /// error the move is abandoned and the game is idle again.
    pub fn handle_direction(&mut self, direction: Side) -> Result<InputOutcome, GameError> {
        if self.state.is_busy() {
            log::debug!("dropping {direction:?}: a move is in flight");
            return Ok(InputOutcome::Dropped);
        }
        let movement = self.state.classify(direction);
        let (animation, landing) = self.plan(movement);
        self.state.activity = Activity::Busy;
        let pending = Pending { movement, landing };

        if self.config.frames_per_jump == 0 {
            return self
                .apply(&animation.collapse())
                .and_then(|()| self.resolve(pending))
                .map(InputOutcome::Resolved)
                .map_err(|err| self.abandon(err));
        }
        self.pending = Some(pending);
        let token = self.animator.start(animation);
        log::debug!("{movement:?} started with {token:?}");
        Ok(InputOutcome::Started { movement, token })
    }

    /// Apply the next frame of the animation identified by `token`.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors; none occur for the game's own scene. On
    /// error the move is abandoned, the game is idle again, and `token` is stale.
    pub fn tick(&mut self, token: AnimationToken) -> Result<TickOutcome, GameError> {
        match self.animator.poll(token) {
            Poll::Stale => {
                log::trace!("ignoring stale tick {token:?}");
                Ok(TickOutcome::Stale)
            }
            Poll::Idle => Ok(TickOutcome::Idle),
            Poll::Frame { frame, remaining } => {
                log::trace!("tick {token:?}: {} steps, {remaining} frames left", frame.len());
                if let Err(err) = self.apply(&frame) {
                    return Err(self.abandon(err));
                }
                if remaining > 0 {
                    return Ok(TickOutcome::Advanced { remaining });
                }
                match self.pending.take() {
                    Some(pending) => self
                        .resolve(pending)
                        .map(TickOutcome::Finished)
                        .map_err(|err| self.abandon(err)),
                    None => Ok(TickOutcome::Idle),
                }
            }
        }
    }

    /// Jump the in-flight move to its end state and resolve it.
    ///
    /// Outstanding tokens become stale. Returns `None` when idle.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors; none occur for the game's own scene. On
    /// error the move is abandoned and the game is idle again.
    pub fn finish_animation(&mut self) -> Result<Option<Landing>, GameError> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        let rest = self.animator.cancel().map(Animation::collapse).unwrap_or_default();
        self.apply(&rest)
            .and_then(|()| self.resolve(pending))
            .map(Some)
            .map_err(|err| self.abandon(err))
    }

    /// Drop the in-flight move after a failure and accept input again.
    fn abandon(&mut self, err: GameError) -> GameError {
        log::warn!("abandoning move: {err}");
        self.animator.cancel();
        self.pending = None;
        self.state.activity = Activity::Idle;
        err
    }

    fn plan(&mut self, movement: Move) -> (Animation, Side) {
        let frames = self.config.frames_per_jump;
        let character = self.model.node(NodeKind::Character);
        let on_rock = self.model.node(NodeKind::OnRock);
        let jump_across = |to: Side, config: &GameConfig| {
            Animation::arc(
                character,
                Some(on_rock),
                to.sign() * config.jump_distance(),
                config.jump_height,
                frames,
            )
        };
        match movement {
            Move::JumpAcross { to } => (jump_across(to, &self.config), to),
            Move::JumpUp => (
                Animation::arc(character, None, 0.0, self.config.jump_height, frames),
                self.state.side,
            ),
            Move::FallIn { toward } => {
                let landing = self.state.recovery_landing(toward);
                let mut animation = Animation::dunk(character, self.config.fall_depth, frames);
                if landing != self.state.side {
                    animation = animation.then(jump_across(landing, &self.config));
                }
                (animation, landing)
            }
        }
    }

    fn apply(&mut self, steps: &[Step]) -> Result<(), GameError> {
        let scene = self.model.scene_mut();
        for step in steps {
            scene.translate(step.node, step.delta.x, step.delta.y)?;
        }
        Ok(())
    }

    fn resolve(&mut self, pending: Pending) -> Result<Landing, GameError> {
        let Pending { movement, landing } = pending;
        self.state.side = landing;
        let next_rock = match movement {
            Move::FallIn { .. } => landing.opposite(),
            Move::JumpAcross { .. } | Move::JumpUp => self.generate_next_rock(landing),
        };
        self.place_next_rock(next_rock)?;
        self.state.activity = Activity::Idle;
        log::info!("{movement:?} landed on {landing:?}, next rock {next_rock:?}");
        Ok(Landing {
            movement,
            side: landing,
            next_rock,
        })
    }

    fn generate_next_rock(&mut self, landed: Side) -> Side {
        if let Some(queued) = self.state.take_queued_next(landed) {
            return queued;
        }
        if self.rng.gen_bool(0.5) {
            Side::Right
        } else {
            Side::Left
        }
    }

    fn place_next_rock(&mut self, side: Side) -> Result<(), GameError> {
        if side == self.state.next_rock {
            return Ok(());
        }
        let id = self.model.node(NodeKind::NextRock);
        let dx = side.sign() * self.config.rock_distance();
        self.model.scene_mut().translate(id, dx, 0.0)?;
        self.state.next_rock = side;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SceneRenderer;
    use approx::assert_abs_diff_eq;
    use kurbo::Rect;
    use rand::RngCore;
    use rockhop_scene::{RecordingSurface, SceneError};

    /// A generator that fails the test if the game asks it for anything.
    struct NoRandomness;

    impl RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("the next rock should have come from a recovery queue");
        }

        fn next_u64(&mut self) -> u64 {
            panic!("the next rock should have come from a recovery queue");
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("the next rock should have come from a recovery queue");
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            panic!("the next rock should have come from a recovery queue");
        }
    }

    fn instant() -> GameConfig {
        GameConfig::default().instant().seeded(7)
    }

    fn state(side: Side, next_rock: Side) -> GameState {
        GameState {
            side,
            next_rock,
            ..Default::default()
        }
    }

    fn run_to_end<R: Rng>(game: &mut Game<R>, token: AnimationToken) -> (usize, Landing) {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match game.tick(token).unwrap() {
                TickOutcome::Advanced { .. } => {}
                TickOutcome::Finished(landing) => return (ticks, landing),
                other => panic!("unexpected {other:?} after {ticks} ticks"),
            }
        }
    }

    fn assert_at(game: &Game<impl Rng>, kind: NodeKind, x: f64, y: f64) {
        let p = game.model().position(kind);
        assert_abs_diff_eq!(p.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, y, epsilon = 1e-9);
    }

    #[test]
    fn jump_across_moves_character_and_rock() {
        let mut game = Game::new(instant()).unwrap();
        let InputOutcome::Resolved(landing) = game.handle_direction(Side::Right).unwrap() else {
            panic!("instant config resolves synchronously");
        };
        assert_eq!(landing.movement, Move::JumpAcross { to: Side::Right });
        assert_eq!(landing.side, Side::Right);
        assert_eq!(game.state().side, Side::Right);
        assert_eq!(game.state().next_rock, landing.next_rock);
        assert!(!game.is_busy());
        assert_at(&game, NodeKind::Character, 600.0, 450.0);
        assert_at(&game, NodeKind::OnRock, 600.0, 550.0);
        let next_x = game.config().next_x(landing.next_rock);
        assert_at(&game, NodeKind::NextRock, next_x, 100.0);
    }

    #[test]
    fn generated_rock_is_always_a_valid_side() {
        for seed in 0..32 {
            let mut game = Game::new(GameConfig::default().instant().seeded(seed)).unwrap();
            game.handle_direction(Side::Right).unwrap();
            let next = game.state().next_rock;
            assert!(matches!(next, Side::Left | Side::Right));
            assert_at(&game, NodeKind::NextRock, game.config().next_x(next), 100.0);
        }
    }

    #[test]
    fn input_during_animation_is_dropped() {
        let mut game = Game::new(GameConfig::default().seeded(3)).unwrap();
        let InputOutcome::Started { movement, token } =
            game.handle_direction(Side::Right).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        assert_eq!(movement, Move::JumpAcross { to: Side::Right });
        assert!(game.is_busy());

        let before = game.state().clone();
        assert_eq!(game.handle_direction(Side::Right).unwrap(), InputOutcome::Dropped);
        assert_eq!(game.handle_direction(Side::Left).unwrap(), InputOutcome::Dropped);
        assert_eq!(game.state(), &before);

        let (ticks, landing) = run_to_end(&mut game, token);
        assert_eq!(ticks, 12);
        assert_eq!(landing.side, Side::Right);
        assert!(!game.is_busy());
        assert_at(&game, NodeKind::Character, 600.0, 450.0);
        assert_eq!(game.tick(token).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn jump_peaks_halfway() {
        let mut game = Game::new(GameConfig::default().seeded(3)).unwrap();
        let InputOutcome::Started { token, .. } = game.handle_direction(Side::Right).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        for _ in 0..6 {
            game.tick(token).unwrap();
        }
        assert_at(&game, NodeKind::Character, 400.0, 370.0);
        // The rock slides along the ground.
        assert_at(&game, NodeKind::OnRock, 400.0, 550.0);
    }

    #[test]
    fn finish_animation_resolves_and_stales_token() {
        let mut game = Game::new(GameConfig::default().seeded(11)).unwrap();
        let InputOutcome::Started { token, .. } = game.handle_direction(Side::Right).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        game.tick(token).unwrap();
        let landing = game.finish_animation().unwrap().unwrap();
        assert_eq!(landing.side, Side::Right);
        assert!(!game.is_busy());
        assert_at(&game, NodeKind::Character, 600.0, 450.0);
        assert_eq!(game.tick(token).unwrap(), TickOutcome::Stale);
        assert_eq!(game.finish_animation().unwrap(), None);
    }

    #[test]
    fn jump_up_pops_recovery_queue_instead_of_rolling() {
        // Standing left with the next rock on the left is a jump up; the left
        // recovery queue starts as [Left], so the next rock comes from it.
        let mut game =
            Game::with_state(instant(), state(Side::Left, Side::Left), NoRandomness).unwrap();
        let InputOutcome::Resolved(landing) = game.handle_direction(Side::Left).unwrap() else {
            panic!("instant config resolves synchronously");
        };
        assert_eq!(landing.movement, Move::JumpUp);
        assert_eq!(landing.side, Side::Left);
        assert_eq!(landing.next_rock, Side::Left);
        assert!(game.state().left_fall.is_empty());
        assert_at(&game, NodeKind::Character, 200.0, 450.0);
        assert_at(&game, NodeKind::NextRock, 300.0, 100.0);
    }

    #[test]
    fn fall_in_replays_queue_without_randomness() {
        let mut game = Game::with_rng(instant(), NoRandomness).unwrap();
        let InputOutcome::Resolved(landing) = game.handle_direction(Side::Left).unwrap() else {
            panic!("instant config resolves synchronously");
        };
        assert_eq!(landing.movement, Move::FallIn { toward: Side::Left });
        assert_eq!(landing.side, Side::Left);
        assert_eq!(landing.next_rock, Side::Right);
        assert!(game.state().left_fall.iter().eq([Side::Left]));
        assert_at(&game, NodeKind::Character, 200.0, 450.0);
        assert_at(&game, NodeKind::NextRock, 500.0, 100.0);
    }

    #[test]
    fn fall_in_can_carry_character_across() {
        let config = GameConfig::default();
        let mut game =
            Game::with_state(config, state(Side::Right, Side::Right), NoRandomness).unwrap();
        let InputOutcome::Started { movement, token } = game.handle_direction(Side::Left).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        assert_eq!(movement, Move::FallIn { toward: Side::Left });

        // Sink then climb out, then jump over to the queued side.
        let (ticks, landing) = run_to_end(&mut game, token);
        assert_eq!(ticks, 24);
        assert_eq!(landing.side, Side::Left);
        assert_eq!(landing.next_rock, Side::Right);
        assert!(game.state().left_fall.iter().eq([Side::Right]));
        assert_at(&game, NodeKind::Character, 200.0, 450.0);
        assert_at(&game, NodeKind::OnRock, 200.0, 550.0);
        assert_at(&game, NodeKind::NextRock, 500.0, 100.0);
    }

    /// Detach the character so every move fails on its first step.
    fn detach_character<R: Rng>(game: &mut Game<R>) {
        let root = game.model.node(NodeKind::Root);
        let character = game.model.node(NodeKind::Character);
        assert!(game.model.scene_mut().remove_child(root, character));
    }

    #[test]
    fn failed_instant_move_leaves_game_idle() {
        let mut game = Game::new(instant()).unwrap();
        detach_character(&mut game);
        let err = game.handle_direction(Side::Right).unwrap_err();
        assert!(matches!(
            err,
            GameError::Scene(SceneError::DetachedNodeOperation(_))
        ));
        assert!(!game.is_busy());
        assert_eq!(game.state().side, Side::Left);
        // The next input is classified again instead of being dropped.
        assert_ne!(
            game.handle_direction(Side::Right),
            Ok(InputOutcome::Dropped)
        );
    }

    #[test]
    fn failed_tick_abandons_move() {
        let mut game = Game::new(GameConfig::default().seeded(9)).unwrap();
        let InputOutcome::Started { token, .. } = game.handle_direction(Side::Right).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        detach_character(&mut game);
        assert!(game.tick(token).is_err());
        assert!(!game.is_busy());
        assert_eq!(game.tick(token).unwrap(), TickOutcome::Stale);
        assert_eq!(game.finish_animation().unwrap(), None);
    }

    #[test]
    fn failed_fast_forward_abandons_move() {
        let mut game = Game::new(GameConfig::default().seeded(9)).unwrap();
        game.handle_direction(Side::Right).unwrap();
        detach_character(&mut game);
        assert!(game.finish_animation().is_err());
        assert!(!game.is_busy());
        assert_eq!(game.finish_animation().unwrap(), None);
    }

    #[test]
    fn attached_renderer_repaints_each_tick() {
        let mut game = Game::new(GameConfig::default().seeded(5)).unwrap();
        let renderer = Rc::new(SceneRenderer::new(
            RecordingSurface::new(),
            Rect::new(0.0, 0.0, 800.0, 600.0),
        ));
        let listener: Rc<dyn SceneListener> = renderer.clone();
        game.attach_listener(&listener).unwrap();
        // Attaching twice does not double the repaints.
        game.attach_listener(&listener).unwrap();

        let InputOutcome::Started { token, .. } = game.handle_direction(Side::Right).unwrap()
        else {
            panic!("animated config starts an animation");
        };
        game.tick(token).unwrap();
        // Character and on-rock both moved.
        assert_eq!(renderer.repaints(), 2);

        assert!(game.detach_listener(&listener));
        game.tick(token).unwrap();
        assert_eq!(renderer.repaints(), 2);
        assert!(!game.detach_listener(&listener));
    }

    #[test]
    fn hits_resolve_to_kinds() {
        let game = Game::new(instant()).unwrap();
        assert_eq!(game.find_hit(Point::new(200.0, 530.0)), Some(NodeKind::OnRock));
        assert_eq!(game.find_hit(Point::new(200.0, 440.0)), Some(NodeKind::Body));
        assert_eq!(game.find_hit(Point::new(700.0, 300.0)), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            on_right: 100.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
