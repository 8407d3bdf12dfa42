// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing surface abstraction and a recording implementation.
//!
//! The scene graph owns no pixels. It paints through a [`RenderSurface`], which
//! a host backs with a canvas, a GPU encoder, a terminal, or anything else that
//! can fill rectangles under a current transform.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::transform::Transform;
use crate::types::Color;

/// A canvas-like drawing target with a current transform and a save/restore stack.
pub trait RenderSurface {
    /// Clears `region`, given in surface (root) coordinates.
    fn clear(&mut self, region: Rect);

    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops back to the most recently saved transform.
    fn restore(&mut self);

    /// Post-multiplies the current transform by `transform`.
    fn transform(&mut self, transform: Transform);

    /// Fills `rect`, given in the current frame.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Runs `draw` with `transform` applied on top of the current frame, then
    /// restores the frame.
    fn with_transform<R>(&mut self, transform: Transform, draw: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        self.save();
        self.transform(transform);
        let out = draw(self);
        self.restore();
        out
    }
}

/// A command captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A clear of a root-space region.
    Clear(Rect),
    /// A fill, with the absolute transform that was current when it was issued.
    Fill {
        /// Rectangle in the frame described by `transform`.
        rect: Rect,
        /// Absolute (root-space) transform at the time of the fill.
        transform: Transform,
        /// Fill color.
        color: Color,
    },
}

/// A [`RenderSurface`] that records clears and fills.
///
/// Useful for tests, debugging, and for hosts that replay a frame elsewhere.
/// A frame starts at a [`clear`](RenderSurface::clear). The recorder keeps the
/// current frame and the one before it; each clear drops anything older, so a
/// long-running repaint loop stays bounded.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    current: Transform,
    stack: Vec<Transform>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recorder with the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retained commands, in issue order: at most the previous and the current frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the fills recorded since the last [`clear`](RenderSurface::clear).
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// The current absolute transform.
    pub fn current_transform(&self) -> Transform {
        self.current
    }

    /// Number of saves not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Takes the recorded commands, keeping the transform state.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, region: Rect) {
        if let Some(previous) = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
        {
            self.commands.drain(..previous);
        }
        self.commands.push(DrawCommand::Clear(region));
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        // An unbalanced restore keeps the current frame, like a canvas does.
        if let Some(t) = self.stack.pop() {
            self.current = t;
        }
    }

    fn transform(&mut self, transform: Transform) {
        self.current = self.current.concatenate(transform);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill {
            rect,
            transform: self.current,
            color,
        });
    }
}
