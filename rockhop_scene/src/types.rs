// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene graph: node identifiers, flags, paint, and local geometry.

use kurbo::Rect;

use crate::transform::Transform;

/// Identifier for a node in a [`SceneGraph`](crate::SceneGraph).
///
/// This is a small, copyable handle into the graph's node arena.
/// Nodes are never destroyed during a session, so a `NodeId` handed out by a
/// graph stays valid for that graph's whole lifetime. Using it with a
/// different graph yields [`SceneError::UnknownNode`](crate::SceneError::UnknownNode)
/// (or, if the index happens to exist there, an unrelated node).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the arena index of this node. The root is always `0`.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Node flags controlling painting and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (painted and hit-testable). Hiding a node hides its subtree.
        const VISIBLE  = 0b0000_0001;
        /// Node is interactable (participates in hit testing). Fixed at insert time.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The local drawing routine of a node.
///
/// A node paints in its own frame; the renderer has already applied the
/// node's local transform on top of its parent's frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Paint {
    /// Draws nothing; the node only groups and positions its children.
    #[default]
    None,
    /// Fills the node's local bounds with a flat color.
    Fill(Color),
}

/// Local data for a node, supplied at insert time.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local bounds in the node's own frame. Never changes after insert.
    pub local_bounds: Rect,
    /// Initial local transform relative to the parent frame.
    pub local_transform: Transform,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
    /// Local drawing routine.
    pub paint: Paint,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Transform::IDENTITY,
            flags: NodeFlags::default(),
            paint: Paint::None,
        }
    }
}

impl LocalNode {
    /// A node with the given bounds as `(x, y, width, height)` and default everything else.
    pub fn with_bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            local_bounds: Rect::new(x, y, x + width, y + height),
            ..Default::default()
        }
    }

    /// Marks the node as interactable.
    #[must_use]
    pub fn pickable(mut self) -> Self {
        self.flags |= NodeFlags::PICKABLE;
        self
    }

    /// Sets the paint routine.
    #[must_use]
    pub fn paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }
}
