// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred two-phase destruction.
//!
//! Widgets often decide to die while the tree is being traversed (a close
//! button handling its own press, for instance). [`destroy`] only marks:
//! interaction references into the subtree are cleared immediately so no
//! event can reach a doomed node through focus, hover, or grab, but the
//! node keeps its place in the tree. [`flush_pending`] later unlinks and
//! frees the marked subtrees, between events, when nothing is iterating.

use crate::command::CommandBus;
use crate::state::{InteractState, WindowHost};
use crate::tree::Tree;
use crate::types::NodeId;

/// Marks the subtree rooted at `id` for destruction.
///
/// Clears focus (posting `focus.lost`), hover, and any pointer grab held
/// by a node in the subtree. The nodes stay alive and attached until
/// [`flush_pending`] runs; queries keep working, but focus can no longer
/// be given to a marked node.
pub fn destroy(
    tree: &mut Tree,
    state: &mut InteractState,
    bus: &mut dyn CommandBus,
    host: &mut dyn WindowHost,
    id: NodeId,
) {
    let mut stack = alloc::vec![id];
    while let Some(at) = stack.pop() {
        if state.is_focused(at) {
            state.set_focus(tree, bus, None);
        }
        if state.is_hovered(at) {
            state.unhover();
        }
        if state.mouse_grab() == Some(at) {
            state.set_mouse_grab(host, None);
        }
        stack.extend_from_slice(tree.children_of(at));
    }
    if !state.pending.contains(&id) {
        state.pending.push(id);
    }
    tree.request_refresh();
}

/// Unlinks and frees every marked subtree. Safe to call with nothing
/// marked.
///
/// Must not run while the tree is being traversed; the application calls
/// it between events.
pub fn flush_pending(tree: &mut Tree, state: &mut InteractState) {
    let pending = core::mem::take(&mut state.pending);
    for id in pending {
        state.on_top.retain(|&t| t != id);
        // A previous entry may have freed this one along with its subtree.
        if !tree.is_alive(id) {
            continue;
        }
        if tree.parent_of(id).is_some() {
            tree.detach(id);
        }
        tree.remove(id);
    }
    // On-top nodes inside freed subtrees went stale with them.
    state.on_top.retain(|&t| tree.is_alive(t));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CaptureHost, RecordingBus};
    use crate::tree::NodeSpec;
    use crate::types::WidgetFlags;

    struct Fixture {
        tree: Tree,
        state: InteractState,
        bus: RecordingBus,
        host: CaptureHost,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tree: Tree::new(),
                state: InteractState::new(),
                bus: RecordingBus::default(),
                host: CaptureHost::default(),
            }
        }

        fn destroy(&mut self, id: NodeId) {
            destroy(
                &mut self.tree,
                &mut self.state,
                &mut self.bus,
                &mut self.host,
                id,
            );
        }
    }

    #[test]
    fn mark_clears_references_but_keeps_node_attached() {
        let mut fx = Fixture::new();
        let root = fx.tree.insert(NodeSpec::default());
        let panel = fx.tree.add_child(root, NodeSpec::default());
        let button = fx.tree.add_child(
            panel,
            NodeSpec {
                flags: WidgetFlags::FOCUSABLE | WidgetFlags::HOVERABLE,
                ..NodeSpec::default()
            },
        );
        fx.state
            .set_focus(&fx.tree, &mut fx.bus, Some(button));
        fx.state.hover = Some(button);
        fx.state.set_mouse_grab(&mut fx.host, Some(button));
        fx.bus.posted.clear();
        fx.host.calls.clear();

        fx.destroy(panel);

        assert_eq!(fx.state.focus(), None);
        assert_eq!(fx.state.hover(), None);
        assert_eq!(fx.state.mouse_grab(), None);
        assert_eq!(fx.host.calls, [false]);
        assert_eq!(fx.bus.posted.len(), 1);
        assert_eq!(fx.bus.posted[0].name(), "focus.lost");
        // Still attached and queryable until the flush.
        assert_eq!(fx.tree.children_of(root), &[panel]);
        assert!(fx.tree.is_alive(button));
        assert!(fx.state.is_pending(panel));
        assert!(fx.tree.take_refresh());
    }

    #[test]
    fn flush_unlinks_and_frees() {
        let mut fx = Fixture::new();
        let root = fx.tree.insert(NodeSpec::default());
        let panel = fx.tree.add_child(root, NodeSpec::default());
        let button = fx.tree.add_child(panel, NodeSpec::default());

        fx.destroy(panel);
        flush_pending(&mut fx.tree, &mut fx.state);

        assert!(fx.tree.children_of(root).is_empty());
        assert!(!fx.tree.is_alive(panel));
        assert!(!fx.tree.is_alive(button));
        assert!(fx.state.pending.is_empty());
    }

    #[test]
    fn flush_drops_on_top_entries_in_subtree() {
        let mut fx = Fixture::new();
        let root = fx.tree.insert(NodeSpec::default());
        let panel = fx.tree.add_child(root, NodeSpec::default());
        let popup = fx.tree.add_child(panel, NodeSpec::default());
        let other = fx.tree.add_child(root, NodeSpec::default());
        fx.state
            .set_flags(&mut fx.tree, popup, WidgetFlags::KEEP_ON_TOP, true);
        fx.state
            .set_flags(&mut fx.tree, other, WidgetFlags::KEEP_ON_TOP, true);

        fx.destroy(panel);
        flush_pending(&mut fx.tree, &mut fx.state);

        assert_eq!(fx.state.on_top(), [other]);
    }

    #[test]
    fn flush_tolerates_nested_marks_and_empty_queue() {
        let mut fx = Fixture::new();
        let root = fx.tree.insert(NodeSpec::default());
        let panel = fx.tree.add_child(root, NodeSpec::default());
        let inner = fx.tree.add_child(panel, NodeSpec::default());

        fx.destroy(panel);
        fx.destroy(inner); // freed along with panel
        fx.destroy(panel); // marking twice is a no-op
        assert_eq!(fx.state.pending.len(), 2);

        flush_pending(&mut fx.tree, &mut fx.state);
        assert!(!fx.tree.is_alive(inner));
        assert_eq!(fx.tree.len(), 1);

        // Nothing marked; nothing happens.
        flush_pending(&mut fx.tree, &mut fx.state);
        assert_eq!(fx.tree.len(), 1);
    }

    #[test]
    fn destroying_detached_node_flushes_cleanly() {
        let mut fx = Fixture::new();
        let loose = fx.tree.insert(NodeSpec::default());
        fx.destroy(loose);
        flush_pending(&mut fx.tree, &mut fx.state);
        assert!(!fx.tree.is_alive(loose));
        assert!(fx.tree.is_empty());
    }
}
