// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rockhop Scene: a Kurbo-native 2D scene graph.
//!
//! - Represents a single-rooted hierarchy of nodes with local transforms, fixed local bounds, flags, and a paint routine.
//! - Caches every node's global transform and refreshes it eagerly on each transform change.
//! - Notifies per-node listeners synchronously after each change; listeners repaint the whole tree.
//! - Paints recursively through a [`RenderSurface`] and hit-tests points through inverse global transforms.
//!
//! ## Transforms
//!
//! [`Transform`] is a value-type 2D affine transform over [`kurbo::Affine`].
//! A node's translate, rotate, and scale calls append the delta in the node's own
//! frame: `local = local.concatenate(delta)`. Afterwards, for every attached node,
//! `global == parent.global.concatenate(local)`, and the root's global equals its local.
//!
//! ## Structure
//!
//! Nodes live in an arena inside [`SceneGraph`] and are addressed by [`NodeId`].
//! Nodes are created once and never destroyed; [`SceneGraph::add_child`] reparents and
//! [`SceneGraph::remove_child`] detaches. A detached node keeps its parent
//! back-reference, is skipped by painting and picking, and rejects transform calls with
//! [`SceneError::DetachedNodeOperation`].
//!
//! ## Picking
//!
//! [`SceneGraph::hit_test`] returns false at once for nodes without
//! [`NodeFlags::PICKABLE`]; otherwise it maps the point through the inverse global
//! transform and tests it against the local bounds, edges included. A singular global
//! transform fails closed. [`HitRegistry`] scans a flat, ordered subset of nodes and
//! returns the first hit.
//!
//! ## API overview
//!
//! - [`SceneGraph`]: node arena, transforms, listeners, paint, picking.
//! - [`LocalNode`]: per-node data supplied at insert time (bounds, transform, flags, paint).
//! - [`SceneListener`]: observer called after changes.
//! - [`RenderSurface`] and [`RecordingSurface`]: drawing target and a recorder.
//! - [`HitRegistry`] and [`Hit`]: ordered first-match picking.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use rockhop_scene::{Color, HitRegistry, LocalNode, Paint, RecordingSurface, SceneGraph};
//!
//! let mut scene = SceneGraph::new("scene", LocalNode::with_bounds(0.0, 0.0, 800.0, 600.0));
//! let root = scene.root();
//! let body = scene
//!     .insert(
//!         root,
//!         "body",
//!         LocalNode::with_bounds(-50.0, -50.0, 100.0, 100.0)
//!             .pickable()
//!             .paint(Paint::Fill(Color::rgb(121, 85, 72))),
//!     )
//!     .unwrap();
//!
//! scene.translate(body, 200.0, 450.0).unwrap();
//!
//! let mut registry = HitRegistry::new();
//! registry.register(body);
//! let hit = registry.find_hit(&scene, Point::new(240.0, 490.0)).unwrap();
//! assert_eq!(hit.node, body);
//! assert!(registry.find_hit(&scene, Point::new(260.0, 450.0)).is_none());
//!
//! let mut surface = RecordingSurface::new();
//! scene.render(&mut surface);
//! assert_eq!(surface.commands().len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod registry;
mod surface;
mod transform;
mod tree;
mod types;
mod util;

pub use error::SceneError;
pub use registry::{Hit, HitRegistry};
pub use surface::{DrawCommand, RecordingSurface, RenderSurface};
pub use transform::{SINGULAR_EPSILON, Transform};
pub use tree::{SceneGraph, SceneListener};
pub use types::{Color, LocalNode, NodeFlags, NodeId, Paint};
