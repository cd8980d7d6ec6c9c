// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window interaction state: focus, hover, pointer grab, the on-top
//! set, and the destruction queue.
//!
//! All of it lives in one [`InteractState`] value owned by the window and
//! passed explicitly into dispatch and drawing. Every field holds weak
//! [`NodeId`] references; the destruction protocol in [`crate::destroy`]
//! clears them before a node is freed, and readers revalidate with
//! [`Tree::is_alive`] regardless.

use alloc::vec::Vec;

use crate::command::{Command, CommandBus};
use crate::tree::Tree;
use crate::types::{NodeId, WidgetFlags};

/// The host window, supplied by the platform layer.
pub trait WindowHost {
    /// Starts or stops routing all pointer input to this window exclusively.
    fn set_pointer_capture(&mut self, active: bool);
}

/// Interaction state for one window's tree.
#[derive(Debug, Default)]
pub struct InteractState {
    pub(crate) hover: Option<NodeId>,
    pub(crate) focus: Option<NodeId>,
    pub(crate) mouse_grab: Option<NodeId>,
    /// Nodes dispatched and drawn ahead of the normal tree, in registration
    /// order. No duplicates.
    pub(crate) on_top: Vec<NodeId>,
    /// Nodes marked for destruction, awaiting [`crate::destroy::flush_pending`].
    pub(crate) pending: Vec<NodeId>,
}

impl InteractState {
    /// Creates an empty interaction state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// The hovered node, if any.
    #[must_use]
    pub fn hover(&self) -> Option<NodeId> {
        self.hover
    }

    /// The pointer-grab target, if a grab is active.
    #[must_use]
    pub fn mouse_grab(&self) -> Option<NodeId> {
        self.mouse_grab
    }

    /// Whether `id` holds keyboard focus.
    #[must_use]
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focus == Some(id)
    }

    /// Whether `id` is the hovered node.
    #[must_use]
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.hover == Some(id)
    }

    /// Whether `id` is marked for destruction.
    #[must_use]
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.pending.contains(&id)
    }

    /// Registered on-top nodes, oldest first.
    #[must_use]
    pub fn on_top(&self) -> &[NodeId] {
        &self.on_top
    }

    /// Moves keyboard focus to `target`, or clears it with `None`.
    ///
    /// No-op when focus is already there. Posts `focus.lost` from the
    /// previous holder and `focus.gained` from the new one.
    ///
    /// # Panics
    ///
    /// If `target` is not focusable, or is marked for destruction.
    pub fn set_focus(
        &mut self,
        tree: &Tree,
        bus: &mut dyn CommandBus,
        target: Option<NodeId>,
    ) {
        if target == self.focus {
            return;
        }
        if let Some(prev) = self.focus.take()
            && tree.is_alive(prev)
        {
            bus.post(Command::new("focus.lost", Some(prev)));
        }
        if let Some(next) = target {
            assert!(
                tree.has_flags(next, WidgetFlags::FOCUSABLE),
                "focus target is not focusable"
            );
            assert!(
                !self.is_pending(next),
                "focus target is marked for destruction"
            );
            self.focus = Some(next);
            bus.post(Command::new("focus.gained", Some(next)));
        }
    }

    /// Starts an exclusive pointer grab for `target`, or ends it with
    /// `None`. No-op when the grab target is already `target`; otherwise
    /// the window host is told to begin or end capture.
    pub fn set_mouse_grab(&mut self, host: &mut dyn WindowHost, target: Option<NodeId>) {
        if target != self.mouse_grab {
            self.mouse_grab = target;
            host.set_pointer_capture(target.is_some());
        }
    }

    /// Clears the hovered node.
    pub fn unhover(&mut self) {
        self.hover = None;
    }

    /// Sets or clears `flags` on the node, keeping the on-top registry in
    /// sync when `KEEP_ON_TOP` is among them.
    pub fn set_flags(&mut self, tree: &mut Tree, id: NodeId, flags: WidgetFlags, on: bool) {
        tree.set_flags_raw(id, flags, on);
        if flags.contains(WidgetFlags::KEEP_ON_TOP) {
            if on {
                if !self.on_top.contains(&id) {
                    self.on_top.push(id);
                }
            } else {
                self.on_top.retain(|&t| t != id);
            }
        }
    }
}
