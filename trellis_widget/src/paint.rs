// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing walk over the tree.
//!
//! The core knows nothing about pixels; it walks the tree in paint order
//! and describes rectangles to the host's [`Painter`].

use kurbo::Rect;

use crate::state::InteractState;
use crate::tree::Tree;
use crate::types::{ColorId, NodeId, WidgetFlags};

/// Frame outlines are drawn at this thickness.
pub const FRAME_THICKNESS: f64 = 1.0;

/// Rendering primitives, supplied by the host.
pub trait Painter {
    /// Fills a world-space rectangle with a palette color.
    fn fill_rect(&mut self, rect: Rect, color: ColorId);

    /// Outlines a world-space rectangle.
    fn frame_rect(&mut self, rect: Rect, thickness: f64, color: ColorId);
}

/// Draws the subtree rooted at `id`.
///
/// Hidden and stale nodes draw nothing. A node with a behavior draws
/// through its [`crate::dispatch::Widget::draw`]; the rest get
/// [`draw_default`].
pub fn draw(tree: &Tree, state: &InteractState, painter: &mut dyn Painter, id: NodeId) {
    if !tree.is_alive(id) || tree.has_flags(id, WidgetFlags::HIDDEN) {
        return;
    }
    match tree.behavior_ref(id) {
        Some(behavior) => behavior.draw(tree, state, painter, id),
        None => draw_default(tree, state, painter, id),
    }
}

/// The substrate drawing every node falls back to: background fill, frame
/// outline, then children in forward order so later siblings paint on
/// top. On-top nodes are excluded from the normal walk; the parentless
/// root paints them last, in registration order, over everything else.
pub fn draw_default(tree: &Tree, state: &InteractState, painter: &mut dyn Painter, id: NodeId) {
    let bounds = tree.bounds(id);
    if let Some(bg) = tree.bg(id) {
        painter.fill_rect(bounds, bg);
    }
    if let Some(frame) = tree.frame(id) {
        painter.frame_rect(bounds, FRAME_THICKNESS, frame);
    }
    for &child in tree.children_of(id) {
        if !tree.has_flags(child, WidgetFlags::KEEP_ON_TOP)
            && !tree.has_flags(child, WidgetFlags::HIDDEN)
        {
            draw(tree, state, painter, child);
        }
    }
    if tree.parent_of(id).is_none() {
        for &top in state.on_top() {
            draw(tree, state, painter, top);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::testing::{PaintOp, RecordingPainter};
    use crate::tree::NodeSpec;

    fn colored(bg: u32, size: Size) -> NodeSpec {
        NodeSpec {
            bg: Some(ColorId(bg)),
            size,
            ..NodeSpec::default()
        }
    }

    #[test]
    fn paints_background_then_frame_then_children() {
        let mut tree = Tree::new();
        let state = InteractState::new();
        let root = tree.insert(NodeSpec {
            bg: Some(ColorId(1)),
            frame: Some(ColorId(2)),
            size: Size::new(100.0, 100.0),
            ..NodeSpec::default()
        });
        let child = tree.add_child(root, colored(3, Size::new(10.0, 10.0)));
        tree.set_pos(child, Point::new(5.0, 5.0));

        let mut painter = RecordingPainter::default();
        draw(&tree, &state, &mut painter, root);

        let full = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            painter.ops,
            [
                PaintOp::Fill(full, ColorId(1)),
                PaintOp::Frame(full, ColorId(2)),
                PaintOp::Fill(Rect::new(5.0, 5.0, 15.0, 15.0), ColorId(3)),
            ]
        );
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let mut tree = Tree::new();
        let state = InteractState::new();
        let root = tree.insert(colored(1, Size::new(50.0, 50.0)));
        let hidden = tree.add_child(root, colored(2, Size::new(10.0, 10.0)));
        let inner = tree.add_child(hidden, colored(3, Size::new(5.0, 5.0)));
        let _ = inner;
        tree.set_flags(hidden, WidgetFlags::HIDDEN, true);

        let mut painter = RecordingPainter::default();
        draw(&tree, &state, &mut painter, root);
        assert_eq!(painter.ops.len(), 1);
    }

    #[test]
    fn on_top_nodes_paint_last_in_registration_order() {
        let mut tree = Tree::new();
        let mut state = InteractState::new();
        let root = tree.insert(colored(1, Size::new(50.0, 50.0)));
        let second = tree.add_child(root, colored(20, Size::new(10.0, 10.0)));
        let first = tree.add_child(root, colored(10, Size::new(10.0, 10.0)));
        let plain = tree.add_child(root, colored(30, Size::new(10.0, 10.0)));
        let _ = plain;
        state.set_flags(&mut tree, first, WidgetFlags::KEEP_ON_TOP, true);
        state.set_flags(&mut tree, second, WidgetFlags::KEEP_ON_TOP, true);

        let mut painter = RecordingPainter::default();
        draw(&tree, &state, &mut painter, root);

        let colors: alloc::vec::Vec<u32> = painter
            .ops
            .iter()
            .map(|op| match op {
                PaintOp::Fill(_, ColorId(c)) | PaintOp::Frame(_, ColorId(c)) => *c,
            })
            .collect();
        // Background, the one plain child, then on-top in registration
        // order (first was registered before second).
        assert_eq!(colors, [1, 30, 10, 20]);
    }

    #[test]
    fn behavior_draw_overrides_default() {
        struct Blank;
        impl crate::dispatch::Widget for Blank {
            fn draw(
                &self,
                _tree: &Tree,
                _state: &InteractState,
                _painter: &mut dyn Painter,
                _id: NodeId,
            ) {
            }
        }

        let mut tree = Tree::new();
        let state = InteractState::new();
        let root = tree.insert(colored(1, Size::new(50.0, 50.0)));
        let quiet = tree.add_child(root, colored(2, Size::new(10.0, 10.0)));
        tree.set_behavior(quiet, Some(alloc::boxed::Box::new(Blank)));

        let mut painter = RecordingPainter::default();
        draw(&tree, &state, &mut painter, root);
        assert_eq!(painter.ops.len(), 1);
    }
}
