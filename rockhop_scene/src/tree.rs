// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene graph implementation: structure, transform propagation, listeners, paint, and picking.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::error::SceneError;
use crate::surface::RenderSurface;
use crate::transform::Transform;
use crate::types::{LocalNode, NodeFlags, NodeId, Paint};
use crate::util::{contains_inclusive, transform_rect_bbox};

/// Observer of node changes.
///
/// Listeners are registered per node with [`SceneGraph::add_listener`] and are
/// called synchronously, in registration order, after every transform change of
/// that node. The graph passes itself so the listener can read it; a listener is
/// expected to repaint the whole tree from the root, there is no partial
/// invalidation.
pub trait SceneListener {
    /// Called after the node this listener is registered on changed.
    fn update(&self, scene: &SceneGraph);
}

/// A scene graph: a single-rooted tree of transformable nodes.
///
/// Every node caches its global transform (relative to the root frame). The
/// cache is refreshed eagerly: when a transform-affecting call returns, every
/// attached node satisfies `global == parent.global * local`, and the root
/// satisfies `global == local`.
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl core::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let listeners: usize = self.nodes.iter().map(|n| n.listeners.len()).sum();
        f.debug_struct("SceneGraph")
            .field("root", &self.nodes[0].name)
            .field("nodes", &self.nodes.len())
            .field("listeners", &listeners)
            .finish_non_exhaustive()
    }
}

struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    global_transform: Transform,
    listeners: Vec<Rc<dyn SceneListener>>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>, local: LocalNode) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            global_transform: local.local_transform,
            local,
            listeners: Vec::new(),
        }
    }
}

impl SceneGraph {
    /// Create a graph holding only its root node.
    pub fn new(root_name: impl Into<String>, root: LocalNode) -> Self {
        Self {
            nodes: alloc::vec![Node::new(root_name.into(), None, root)],
        }
    }

    /// The root node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Number of nodes, including the root and detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a new node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] if `parent` is not in this graph and
    /// [`SceneError::DuplicateName`] if `name` is taken.
    pub fn insert(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: LocalNode,
    ) -> Result<NodeId, SceneError> {
        let name = name.into();
        self.node(parent)?;
        if self.find(&name).is_some() {
            return Err(SceneError::DuplicateName(name));
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::new(name, Some(parent), local));
        self.nodes[parent.idx()].children.push(id);
        self.update_global_recursive(id);
        Ok(id)
    }

    /// Attach `child` as the last child of `parent`, detaching it from its previous parent first.
    ///
    /// The global transforms of `child` and its descendants are recomputed.
    /// Listeners are not notified.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] for foreign ids, [`SceneError::RootReparent`]
    /// if `child` is the root, and [`SceneError::WouldCycle`] if `parent` is
    /// `child` or one of its descendants.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root() {
            return Err(SceneError::RootReparent);
        }
        if self.ancestors_inclusive(parent).any(|a| a == child) {
            return Err(SceneError::WouldCycle { parent, child });
        }
        if let Some(old) = self.nodes[child.idx()].parent {
            self.nodes[old.idx()].children.retain(|c| *c != child);
        }
        self.nodes[parent.idx()].children.push(child);
        self.nodes[child.idx()].parent = Some(parent);
        self.update_global_recursive(child);
        Ok(())
    }

    /// Remove `child` from `parent`'s child list.
    ///
    /// Returns `false` and changes nothing when `child` is not a child of
    /// `parent`. A removed child keeps its parent back-reference and is
    /// [detached](Self::is_detached) until it is attached again with
    /// [`add_child`](Self::add_child).
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(p) = self.nodes.get_mut(parent.idx()) else {
            return false;
        };
        let Some(pos) = p.children.iter().position(|c| *c == child) else {
            return false;
        };
        p.children.remove(pos);
        log::debug!("detached {child:?} from {parent:?}");
        true
    }

    /// Returns true if `id`, or one of its ancestors, claims a parent that does
    /// not list it as a child. Detached nodes are not painted and cannot be hit.
    pub fn is_detached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.nodes.get(current.idx()).and_then(|n| n.parent) {
            if !self.nodes[parent.idx()].children.contains(&current) {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Translate a node in its own local frame.
    ///
    /// # Errors
    ///
    /// See [`apply_local`](Self::apply_local).
    pub fn translate(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), SceneError> {
        self.apply_local(id, Transform::translate(dx, dy))
    }

    /// Rotate a node by `theta` radians about `(cx, cy)` in its own local frame.
    ///
    /// # Errors
    ///
    /// See [`apply_local`](Self::apply_local).
    pub fn rotate(&mut self, id: NodeId, theta: f64, cx: f64, cy: f64) -> Result<(), SceneError> {
        self.apply_local(id, Transform::rotate_about(theta, cx, cy))
    }

    /// Scale a node in its own local frame.
    ///
    /// # Errors
    ///
    /// See [`apply_local`](Self::apply_local).
    pub fn scale(&mut self, id: NodeId, sx: f64, sy: f64) -> Result<(), SceneError> {
        self.apply_local(id, Transform::scale(sx, sy))
    }

    /// Append `delta` to a node's local transform (`local = local * delta`).
    ///
    /// The node's global transform and those of all its descendants are
    /// recomputed top-down, then the node's listeners are notified exactly once,
    /// before this returns.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] for foreign ids and
    /// [`SceneError::DetachedNodeOperation`] for [detached](Self::is_detached)
    /// nodes. Nothing is mutated on error.
    pub fn apply_local(&mut self, id: NodeId, delta: Transform) -> Result<(), SceneError> {
        self.node(id)?;
        if self.is_detached(id) {
            log::warn!("ignoring transform of detached node {id:?}");
            return Err(SceneError::DetachedNodeOperation(id));
        }
        let local = &mut self.nodes[id.idx()].local.local_transform;
        *local = local.concatenate(delta);
        self.update_global_recursive(id);
        self.notify(id);
        Ok(())
    }

    /// Show or hide a node and its subtree, notifying the node's listeners.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] for foreign ids.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.local.flags.set(NodeFlags::VISIBLE, visible);
        self.notify(id);
        Ok(())
    }

    /// Register a listener on a node. Registering the same listener twice has no effect.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] for foreign ids.
    pub fn add_listener(
        &mut self,
        id: NodeId,
        listener: Rc<dyn SceneListener>,
    ) -> Result<(), SceneError> {
        let listeners = &mut self.node_mut(id)?.listeners;
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
        Ok(())
    }

    /// Unregister a listener from a node.
    ///
    /// Returns `false` when the listener was not registered there (or the node
    /// is unknown); that case is a silent no-op.
    pub fn remove_listener(&mut self, id: NodeId, listener: &Rc<dyn SceneListener>) -> bool {
        let Some(node) = self.nodes.get_mut(id.idx()) else {
            return false;
        };
        let before = node.listeners.len();
        node.listeners.retain(|l| !same_listener(l, listener));
        node.listeners.len() != before
    }

    /// Call [`SceneListener::update`] on every listener of `id`, in registration order.
    pub fn notify(&self, id: NodeId) {
        let Some(node) = self.nodes.get(id.idx()) else {
            return;
        };
        for listener in &node.listeners {
            listener.update(self);
        }
    }

    /// Paint the whole tree onto `surface`, starting at the root.
    ///
    /// Each node paints inside a scoped save/transform/restore, so a node's
    /// local transform applies to it and its descendants but never to its
    /// siblings. Children paint after their parent, in child order.
    pub fn render<S: RenderSurface>(&self, surface: &mut S) {
        self.render_node(self.root(), surface);
    }

    /// Returns true if the root-space point `pt` lies inside the node's local
    /// bounds (inclusive on all edges).
    ///
    /// Non-pickable nodes return false without inverting anything. Hidden and
    /// detached nodes return false. A singular global transform fails closed.
    pub fn hit_test(&self, id: NodeId, pt: Point) -> bool {
        let Some(node) = self.nodes.get(id.idx()) else {
            return false;
        };
        if !node.local.flags.contains(NodeFlags::PICKABLE) {
            return false;
        }
        if !self.is_visible(id) || self.is_detached(id) {
            return false;
        }
        match node.global_transform.invert() {
            Ok(inverse) => contains_inclusive(node.local.local_bounds, inverse.map_point(pt)),
            Err(err) => {
                log::debug!("hit test on {id:?} failed closed: {err}");
                false
            }
        }
    }

    /// Find a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        let idx = self.nodes.iter().position(|n| n.name == name)?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32);
        Some(id)
    }

    /// The node's name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.idx()).map(|n| n.name.as_str())
    }

    /// The node's parent back-reference; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.idx()).and_then(|n| n.parent)
    }

    /// The node's children, in paint order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.idx())
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// The node's transform relative to its parent.
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id.idx()).map(|n| n.local.local_transform)
    }

    /// The node's cached transform relative to the root frame.
    pub fn global_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id.idx()).map(|n| n.global_transform)
    }

    /// The node's fixed local bounds.
    pub fn local_bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id.idx()).map(|n| n.local.local_bounds)
    }

    /// Conservative root-space AABB of the node's local bounds.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes
            .get(id.idx())
            .map(|n| transform_rect_bbox(n.global_transform.as_affine(), n.local.local_bounds))
    }

    /// The node's flags.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.nodes.get(id.idx()).map(|n| n.local.flags)
    }

    /// The node's paint routine.
    pub fn paint(&self, id: NodeId) -> Option<Paint> {
        self.nodes.get(id.idx()).map(|n| n.local.paint)
    }

    /// Path from the root to `id` (inclusive), following parent back-references.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.ancestors_inclusive(id).collect();
        out.reverse();
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id.idx()).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(id.idx())
            .ok_or(SceneError::UnknownNode(id))
    }

    fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.nodes.get(id.idx()).map(|_| id);
        core::iter::successors(start, |n| self.nodes[n.idx()].parent)
    }

    fn is_visible(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id)
            .all(|a| self.nodes[a.idx()].local.flags.contains(NodeFlags::VISIBLE))
    }

    fn update_global_recursive(&mut self, id: NodeId) {
        let node = &self.nodes[id.idx()];
        let global = match node.parent {
            Some(parent) => self.nodes[parent.idx()]
                .global_transform
                .concatenate(node.local.local_transform),
            None => node.local.local_transform,
        };
        self.nodes[id.idx()].global_transform = global;
        for i in 0..self.nodes[id.idx()].children.len() {
            let child = self.nodes[id.idx()].children[i];
            self.update_global_recursive(child);
        }
    }

    fn render_node<S: RenderSurface>(&self, id: NodeId, surface: &mut S) {
        let node = &self.nodes[id.idx()];
        if !node.local.flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        surface.with_transform(node.local.local_transform, |surface| {
            if let Paint::Fill(color) = node.local.paint {
                surface.fill_rect(node.local.local_bounds, color);
            }
            for &child in &node.children {
                self.render_node(child, surface);
            }
        });
    }
}

fn same_listener(a: &Rc<dyn SceneListener>, b: &Rc<dyn SceneListener>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
