// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-stepped translation animations and their cancellation tokens.
//!
//! An [`Animation`] is a queue of [`Frame`]s; a frame is a list of node
//! translations applied together in one tick. The [`Animator`] holds at most
//! one running animation and hands out an [`AnimationToken`] per start, so a
//! timer armed for an older animation cannot advance a newer one.

use std::collections::VecDeque;

use kurbo::Vec2;
use rockhop_scene::NodeId;

/// One node translation, in the node's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Node to move.
    pub node: NodeId,
    /// Translation to append to the node's local transform.
    pub delta: Vec2,
}

/// Steps applied together in one tick.
pub type Frame = Vec<Step>;

/// A finite sequence of frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    frames: VecDeque<Frame>,
}

/// Height of a unit parabolic arc at `t ∈ [0, 1]`: zero at both ends, one at the middle.
fn arc_height(t: f64) -> f64 {
    let u = 2.0 * t - 1.0;
    1.0 - u * u
}

impl Animation {
    /// An animation with no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `node` by `dx` along a parabolic arc peaking `height` above its start.
    ///
    /// The vertical rise spans the first half of the frames and the fall the
    /// second half; horizontal motion is spread evenly. `slide`, if given, moves
    /// horizontally in lockstep. A negative `height` sinks instead of rising.
    /// `frames` is clamped to at least one; with one frame the node moves
    /// straight to its destination.
    pub fn arc(node: NodeId, slide: Option<NodeId>, dx: f64, height: f64, frames: u32) -> Self {
        let n = frames.max(1);
        let at = |i: u32| {
            let t = f64::from(i) / f64::from(n);
            Vec2::new(dx * t, -height * arc_height(t))
        };
        let frames = (1..=n)
            .map(|i| {
                let delta = at(i) - at(i - 1);
                let mut frame = Frame::new();
                if delta != Vec2::ZERO {
                    frame.push(Step { node, delta });
                }
                if let Some(slide) = slide
                    && delta.x != 0.0
                {
                    frame.push(Step {
                        node: slide,
                        delta: Vec2::new(delta.x, 0.0),
                    });
                }
                frame
            })
            .collect();
        Self { frames }
    }

    /// Sink `node` by `depth` and bring it back up, in place.
    pub fn dunk(node: NodeId, depth: f64, frames: u32) -> Self {
        Self::arc(node, None, 0.0, -depth, frames)
    }

    /// This animation followed by `next`.
    #[must_use]
    pub fn then(mut self, next: Self) -> Self {
        self.frames.extend(next.frames);
        self
    }

    /// Every remaining step, in order, as a single frame.
    pub fn collapse(self) -> Frame {
        self.frames.into_iter().flatten().collect()
    }

    /// Number of frames left.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frames are left.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Net translation of `node` over the remaining frames.
    pub fn displacement(&self, node: NodeId) -> Vec2 {
        self.frames
            .iter()
            .flatten()
            .filter(|s| s.node == node)
            .fold(Vec2::ZERO, |acc, s| acc + s.delta)
    }

    fn pop_front(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }
}

/// Identifies one started animation.
///
/// Ticks must present the token of the running animation; any other token is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

/// Result of [`Animator::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum Poll {
    /// The token does not belong to the running animation.
    Stale,
    /// Nothing is running.
    Idle,
    /// The next frame to apply, and how many remain after it.
    Frame {
        /// Steps to apply now.
        frame: Frame,
        /// Frames left after this one; `0` means the animation just finished.
        remaining: usize,
    },
}

/// Runs at most one animation at a time.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    generation: u64,
    current: Option<Animation>,
}

impl Animator {
    /// An idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `animation`, replacing and invalidating any running one.
    pub fn start(&mut self, animation: Animation) -> AnimationToken {
        self.generation += 1;
        self.current = Some(animation);
        AnimationToken(self.generation)
    }

    /// Take the next frame of the animation identified by `token`.
    pub fn poll(&mut self, token: AnimationToken) -> Poll {
        if token.0 != self.generation {
            return Poll::Stale;
        }
        let Some(animation) = self.current.as_mut() else {
            return Poll::Idle;
        };
        let Some(frame) = animation.pop_front() else {
            self.current = None;
            return Poll::Idle;
        };
        let remaining = animation.len();
        if remaining == 0 {
            self.current = None;
        }
        Poll::Frame { frame, remaining }
    }

    /// Stop the running animation and return its unplayed frames.
    ///
    /// Every token handed out so far becomes stale.
    pub fn cancel(&mut self) -> Option<Animation> {
        self.generation += 1;
        self.current.take()
    }

    /// Returns true while an animation has frames left.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }
}
