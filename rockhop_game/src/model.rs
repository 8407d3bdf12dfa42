// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node kinds and assembly of the rock-hopping scene.

use std::rc::Rc;

use kurbo::{Point, Rect};
use rockhop_scene::{
    Color, Hit, HitRegistry, LocalNode, NodeId, Paint, SceneGraph, SceneListener, Transform,
};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::state::GameState;

/// The closed set of node kinds in the scene.
///
/// A kind fixes a node's local bounds, whether it can be hit, and how it paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The canvas.
    Root,
    /// The whole character; positions its parts.
    Character,
    /// The character's body.
    Body,
    /// Groups both rocks.
    RockGroup,
    /// The rock the character stands on.
    OnRock,
    /// The upcoming rock.
    NextRock,
}

impl NodeKind {
    /// Every kind, in assembly order.
    pub const ALL: [Self; 6] = [
        Self::Root,
        Self::Character,
        Self::Body,
        Self::RockGroup,
        Self::OnRock,
        Self::NextRock,
    ];

    /// Node name used in the scene graph.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "scene",
            Self::Character => "character",
            Self::Body => "body",
            Self::RockGroup => "rocks",
            Self::OnRock => "on_rock",
            Self::NextRock => "next_rock",
        }
    }

    /// Fixed bounds in the node's own frame.
    pub fn local_bounds(self, config: &GameConfig) -> Rect {
        let (x, y, w, h) = match self {
            Self::Root => (0.0, 0.0, config.canvas_width, config.canvas_height),
            Self::Character | Self::Body | Self::RockGroup => (-50.0, -50.0, 100.0, 100.0),
            Self::OnRock => (-50.0, -50.0, 100.0, 50.0),
            Self::NextRock => (-50.0, -50.0, 80.0, 30.0),
        };
        Rect::new(x, y, x + w, y + h)
    }

    /// Whether input can hit this node.
    pub const fn is_interactable(self) -> bool {
        matches!(self, Self::Body | Self::OnRock | Self::NextRock)
    }

    /// The node's drawing routine.
    pub const fn paint(self) -> Paint {
        match self {
            Self::Root | Self::Character | Self::RockGroup => Paint::None,
            Self::Body => Paint::Fill(Color::rgb(121, 85, 72)),
            Self::OnRock => Paint::Fill(Color::rgb(174, 182, 191)),
            Self::NextRock => Paint::Fill(Color::rgb(128, 139, 150)),
        }
    }

    /// Scene-graph node data for this kind, placed by `transform`.
    pub fn local_node(self, config: &GameConfig, transform: Transform) -> LocalNode {
        let node = LocalNode {
            local_bounds: self.local_bounds(config),
            local_transform: transform,
            ..Default::default()
        }
        .paint(self.paint());
        if self.is_interactable() {
            node.pickable()
        } else {
            node
        }
    }
}

/// The assembled scene: graph, node handles, and the hit registry.
///
/// ```text
/// scene
/// ├── character
/// │   └── body
/// └── rocks
///     ├── on_rock
///     └── next_rock
/// ```
#[derive(Debug)]
pub struct RockScene {
    scene: SceneGraph,
    ids: [NodeId; 6],
    registry: HitRegistry,
}

impl RockScene {
    /// Build the tree with nodes placed for `state`.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors; none occur for a fresh graph.
    pub fn build(config: &GameConfig, state: &GameState) -> Result<Self, GameError> {
        let mut scene = SceneGraph::new(
            NodeKind::Root.name(),
            NodeKind::Root.local_node(config, Transform::IDENTITY),
        );
        let root = scene.root();
        let place = |kind: NodeKind, x: f64, y: f64| {
            kind.local_node(config, Transform::translate(x, y))
        };

        let character = scene.insert(
            root,
            NodeKind::Character.name(),
            place(NodeKind::Character, config.on_x(state.side), config.character_y),
        )?;
        let body = scene.insert(
            character,
            NodeKind::Body.name(),
            place(NodeKind::Body, 0.0, 0.0),
        )?;
        let rocks = scene.insert(
            root,
            NodeKind::RockGroup.name(),
            place(NodeKind::RockGroup, 0.0, 0.0),
        )?;
        let on_rock = scene.insert(
            rocks,
            NodeKind::OnRock.name(),
            place(NodeKind::OnRock, config.on_x(state.side), config.on_rock_y),
        )?;
        let next_rock = scene.insert(
            rocks,
            NodeKind::NextRock.name(),
            place(NodeKind::NextRock, config.next_x(state.next_rock), config.next_rock_y),
        )?;

        // Rocks take priority over the character where they overlap.
        let mut registry = HitRegistry::new();
        for id in [on_rock, next_rock, rocks, body, character] {
            registry.register(id);
        }

        Ok(Self {
            scene,
            ids: [root, character, body, rocks, on_rock, next_rock],
            registry,
        })
    }

    /// The scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The scene graph, mutably.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// The node of the given kind.
    pub fn node(&self, kind: NodeKind) -> NodeId {
        self.ids[kind as usize]
    }

    /// The kind of a node of this scene.
    pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|k| self.node(*k) == id)
    }

    /// The ordered hit registry.
    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    /// First interactive node under the root-space point, with its kind.
    pub fn find_hit(&self, pt: Point) -> Option<(NodeKind, Hit)> {
        let hit = self.registry.find_hit(&self.scene, pt)?;
        let kind = self.kind_of(hit.node)?;
        Some((kind, hit))
    }

    /// Root-space position of a node's origin.
    pub fn position(&self, kind: NodeKind) -> Point {
        self.scene
            .global_transform(self.node(kind))
            .unwrap_or_default()
            .map_point(Point::ORIGIN)
    }

    /// Register `listener` on every node.
    ///
    /// # Errors
    ///
    /// Propagates scene graph errors; none occur for this scene's own nodes.
    pub fn add_listener_everywhere(
        &mut self,
        listener: &Rc<dyn SceneListener>,
    ) -> Result<(), GameError> {
        for id in self.ids {
            self.scene.add_listener(id, listener.clone())?;
        }
        Ok(())
    }

    /// Unregister `listener` from every node. Returns true if it was registered anywhere.
    pub fn remove_listener_everywhere(&mut self, listener: &Rc<dyn SceneListener>) -> bool {
        let mut removed = false;
        for id in self.ids {
            removed |= self.scene.remove_listener(id, listener);
        }
        removed
    }
}
