// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, ordered registry of interactive nodes for input dispatch.

use alloc::vec::Vec;
use kurbo::Point;

use crate::tree::SceneGraph;
use crate::types::NodeId;

/// Result of [`HitRegistry::find_hit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// An ordered list of nodes considered for picking.
///
/// The registry does not have to cover the whole tree. Lookup scans entries in
/// registration order and the first node whose [`SceneGraph::hit_test`]
/// succeeds wins, so when bounds overlap, register the node that should take
/// priority first.
#[derive(Clone, Debug, Default)]
pub struct HitRegistry {
    entries: Vec<NodeId>,
}

impl HitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Returns `false` if it was already registered; its position is kept.
    pub fn register(&mut self, id: NodeId) -> bool {
        if self.entries.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Remove a node. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: NodeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| *e != id);
        self.entries.len() != before
    }

    /// Registered nodes in scan order.
    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first registered node hit by the root-space point `pt`, if any.
    pub fn find_hit(&self, scene: &SceneGraph, pt: Point) -> Option<Hit> {
        let node = self
            .entries
            .iter()
            .copied()
            .find(|id| scene.hit_test(*id, pt))?;
        Some(Hit {
            node,
            path: scene.path_to_root(node),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalNode;
    use alloc::vec;

    fn overlapping() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut scene = SceneGraph::new("scene", LocalNode::with_bounds(0.0, 0.0, 800.0, 600.0));
        let root = scene.root();
        let big = scene
            .insert(root, "big", LocalNode::with_bounds(0.0, 0.0, 100.0, 100.0).pickable())
            .unwrap();
        let small = scene
            .insert(root, "small", LocalNode::with_bounds(40.0, 40.0, 20.0, 20.0).pickable())
            .unwrap();
        let inert = scene
            .insert(root, "inert", LocalNode::with_bounds(0.0, 0.0, 800.0, 600.0))
            .unwrap();
        (scene, big, small, inert)
    }

    #[test]
    fn first_registered_wins_on_overlap() {
        let (scene, big, small, _) = overlapping();
        let mut reg = HitRegistry::new();
        reg.register(small);
        reg.register(big);
        let hit = reg.find_hit(&scene, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.node, small);
        assert_eq!(hit.path, vec![scene.root(), small]);

        let mut reversed = HitRegistry::new();
        reversed.register(big);
        reversed.register(small);
        let hit = reversed.find_hit(&scene, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.node, big, "registration order decides");
    }

    #[test]
    fn misses_and_non_pickable_entries() {
        let (scene, big, _, inert) = overlapping();
        let mut reg = HitRegistry::new();
        reg.register(inert);
        reg.register(big);
        assert_eq!(
            reg.find_hit(&scene, Point::new(10.0, 10.0)).map(|h| h.node),
            Some(big),
            "non-pickable entries are skipped"
        );
        assert!(reg.find_hit(&scene, Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn register_is_idempotent() {
        let (_, big, small, _) = overlapping();
        let mut reg = HitRegistry::new();
        assert!(reg.register(big));
        assert!(reg.register(small));
        assert!(!reg.register(big));
        assert_eq!(reg.entries(), &[big, small]);
        assert!(reg.unregister(big));
        assert!(!reg.unregister(big));
        assert_eq!(reg.len(), 1);
    }
}
