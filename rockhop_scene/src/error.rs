// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for scene graph operations.

use alloc::string::String;

use crate::types::NodeId;

/// Errors reported by [`SceneGraph`](crate::SceneGraph) and [`Transform`](crate::Transform).
///
/// Removing a listener that was never registered is not an error; see
/// [`SceneGraph::remove_listener`](crate::SceneGraph::remove_listener).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// Inversion was attempted on a transform whose determinant is (nearly) zero.
    ///
    /// Hit testing turns this into a miss instead of propagating it.
    #[error("transform is not invertible (determinant {determinant})")]
    SingularTransform {
        /// The offending determinant.
        determinant: f64,
    },
    /// A transform call targeted a node whose parent no longer lists it as a child.
    #[error("node {0:?} is detached: its parent does not list it as a child")]
    DetachedNodeOperation(NodeId),
    /// The identifier does not belong to this graph.
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),
    /// Node names are unique within a graph.
    #[error("a node named `{0}` already exists")]
    DuplicateName(String),
    /// The root has no parent and cannot be attached under another node.
    #[error("the root node cannot become a child")]
    RootReparent,
    /// Attaching `child` under `parent` would create a cycle.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child; `parent` is this node or one of its descendants.
        child: NodeId,
    },
}
