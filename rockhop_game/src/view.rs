// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer: a scene listener that repaints a surface on every change.

use std::cell::{Cell, RefCell};

use kurbo::Rect;
use rockhop_scene::{RenderSurface, SceneGraph, SceneListener};

/// Repaints the whole scene onto its surface whenever a watched node changes.
///
/// Register it on nodes with
/// [`Game::attach_listener`](crate::Game::attach_listener) or
/// [`SceneGraph::add_listener`]. Each notification clears `viewport` and
/// renders from the root.
#[derive(Debug)]
pub struct SceneRenderer<S> {
    surface: RefCell<S>,
    viewport: Rect,
    repaints: Cell<usize>,
}

impl<S: RenderSurface> SceneRenderer<S> {
    /// A renderer that clears `viewport` before every repaint.
    pub fn new(surface: S, viewport: Rect) -> Self {
        Self {
            surface: RefCell::new(surface),
            viewport,
            repaints: Cell::new(0),
        }
    }

    /// Clear the viewport and paint `scene` from its root.
    pub fn repaint(&self, scene: &SceneGraph) {
        let Ok(mut surface) = self.surface.try_borrow_mut() else {
            log::debug!("surface busy, skipping nested repaint");
            return;
        };
        surface.clear(self.viewport);
        scene.render(&mut *surface);
        self.repaints.set(self.repaints.get() + 1);
    }

    /// Number of completed repaints.
    pub fn repaints(&self) -> usize {
        self.repaints.get()
    }

    /// The cleared region.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Run `f` with the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.surface.borrow_mut())
    }

    /// Unwrap the surface.
    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }
}

impl<S: RenderSurface> SceneListener for SceneRenderer<S> {
    fn update(&self, scene: &SceneGraph) {
        self.repaint(scene);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use rockhop_scene::{Color, DrawCommand, LocalNode, Paint, RecordingSurface, Transform};

    const VIEW: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn every_notification_clears_and_repaints() {
        let mut scene = SceneGraph::new("root", LocalNode::default());
        let root = scene.root();
        let leaf = scene
            .insert(
                root,
                "leaf",
                LocalNode::with_bounds(0.0, 0.0, 10.0, 10.0).paint(Paint::Fill(Color::rgb(1, 2, 3))),
            )
            .unwrap();
        let renderer = Rc::new(SceneRenderer::new(RecordingSurface::new(), VIEW));
        scene.add_listener(leaf, renderer.clone()).unwrap();

        scene.translate(leaf, 5.0, 0.0).unwrap();
        scene.translate(leaf, 5.0, 0.0).unwrap();
        assert_eq!(renderer.repaints(), 2);

        renderer.with_surface(|s| {
            assert_eq!(s.commands().len(), 4);
            assert_eq!(
                s.last_frame(),
                &[DrawCommand::Fill {
                    rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                    transform: Transform::translate(10.0, 0.0),
                    color: Color::rgb(1, 2, 3),
                }]
            );
        });
    }

    #[test]
    fn nested_repaint_is_skipped() {
        let scene = SceneGraph::new("root", LocalNode::default());
        let renderer = SceneRenderer::new(RecordingSurface::new(), VIEW);
        renderer.with_surface(|_| renderer.repaint(&scene));
        assert_eq!(renderer.repaints(), 0);
        renderer.repaint(&scene);
        assert_eq!(renderer.repaints(), 1);
        assert_eq!(renderer.into_surface().commands(), &[DrawCommand::Clear(VIEW)]);
    }

    #[test]
    fn recording_stays_bounded_over_many_repaints() {
        let mut scene = SceneGraph::new("root", LocalNode::default());
        let root = scene.root();
        let leaf = scene
            .insert(
                root,
                "leaf",
                LocalNode::with_bounds(0.0, 0.0, 10.0, 10.0).paint(Paint::Fill(Color::rgb(1, 2, 3))),
            )
            .unwrap();
        let renderer = Rc::new(SceneRenderer::new(RecordingSurface::new(), VIEW));
        scene.add_listener(leaf, renderer.clone()).unwrap();
        for _ in 0..500 {
            scene.translate(leaf, 1.0, 0.0).unwrap();
        }
        assert_eq!(renderer.repaints(), 500);
        renderer.with_surface(|s| assert_eq!(s.commands().len(), 4, "previous and current frame"));
    }
}
