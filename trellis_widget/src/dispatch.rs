// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing through the tree.
//!
//! Dispatch is a depth-first walk with three priority lanes handled at the
//! root: an active pointer grab short-circuits everything, keyboard events
//! go to the focused node first, and on-top nodes are offered the event
//! before the normal tree. Within the tree, children are offered events in
//! reverse order so that whatever is drawn on top gets first refusal.

use alloc::vec::Vec;

use crate::command::{Command, CommandBus};
use crate::event::{Event, Key, Modifiers};
use crate::focus::find_focusable;
use crate::paint::Painter;
use crate::state::{InteractState, WindowHost};
use crate::tree::Tree;
use crate::types::{FocusDir, NodeId, WidgetFlags};

/// Node behavior: the open capability set a widget kind implements.
///
/// Both methods default to the substrate behavior, so a behavior only
/// overrides what it cares about. Installed per node with
/// [`Tree::set_behavior`].
pub trait Widget {
    /// Processes an event reaching the node after its children declined
    /// it. Returns whether the event was consumed.
    fn event(&mut self, cx: &mut EventCx<'_>, id: NodeId, event: &Event) -> bool {
        default_process_event(cx, id, event)
    }

    /// Draws the node and its subtree.
    fn draw(&self, tree: &Tree, state: &InteractState, painter: &mut dyn Painter, id: NodeId) {
        crate::paint::draw_default(tree, state, painter, id);
    }
}

/// Mutable context threaded through a dispatch: the tree, the window's
/// interaction state, and the outward-facing collaborators.
pub struct EventCx<'a> {
    /// The tree being dispatched into.
    pub tree: &'a mut Tree,
    /// The window's interaction state.
    pub state: &'a mut InteractState,
    /// Outbound command transport.
    pub bus: &'a mut dyn CommandBus,
    /// The host window.
    pub host: &'a mut dyn WindowHost,
}

impl core::fmt::Debug for EventCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCx")
            .field("tree", &self.tree)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl EventCx<'_> {
    /// Offers `event` to the subtree rooted at `id`. Returns whether some
    /// node consumed it.
    ///
    /// Dispatch from a parentless node runs the root duties first: pointer
    /// events are rerouted to an active grab target, pointer motion clears
    /// the hover node for reacquisition, keyboard events go to the focused
    /// node, and on-top nodes get the event ahead of the tree.
    pub fn dispatch(&mut self, id: NodeId, event: &Event) -> bool {
        if !self.tree.is_alive(id) {
            return false;
        }
        if self.tree.parent_of(id).is_none() {
            if event.is_pointer()
                && let Some(grab) = self.state.mouse_grab()
                && grab != id
            {
                return self.dispatch(grab, event);
            }
            if matches!(event, Event::PointerMove { .. }) {
                // Hover node may change.
                self.state.unhover();
            }
            if event.is_keyboard()
                && let Some(focus) = self.state.focus()
                && focus != id
                && self.dispatch(focus, event)
            {
                return true;
            }
            // On-top nodes see the event before the rest of the tree.
            let on_top: Vec<NodeId> = self.state.on_top().to_vec();
            for top in on_top {
                if top != id && self.tree.is_visible(top) && self.dispatch(top, event) {
                    return true;
                }
            }
        } else if let Event::PointerMove { pos } = event
            && self.state.hover().is_none()
            && self.tree.has_flags(id, WidgetFlags::HOVERABLE)
            && !self.tree.has_flags(id, WidgetFlags::HIDDEN)
            && !self.tree.has_flags(id, WidgetFlags::DISABLED)
            && self.tree.contains(id, *pos)
        {
            self.state.hover = Some(id);
        }
        if self.filter(id, event) {
            // Children are offered the event first, in reverse order so
            // the ones drawn on top get it before their siblings.
            let children: Vec<NodeId> = self.tree.children_of(id).to_vec();
            for &child in children.iter().rev() {
                if event.is_keyboard() && self.state.is_focused(child) {
                    // Already dispatched through the focus lane.
                    continue;
                }
                if self.tree.is_visible(child)
                    && self.tree.has_flags(child, WidgetFlags::KEEP_ON_TOP)
                {
                    // Already dispatched through the on-top lane.
                    continue;
                }
                if self.dispatch(child, event) {
                    return true;
                }
            }
            if self.process(id, event) {
                return true;
            }
        }
        false
    }

    /// Whether the node lets `event` through to its subtree and itself.
    /// Disabled nodes block all input; hidden nodes block pointer input
    /// but still pass keyboard events (a hidden node may hold focus).
    /// Command events always pass.
    fn filter(&self, id: NodeId, event: &Event) -> bool {
        let flags = self.tree.flags(id);
        if flags.contains(WidgetFlags::DISABLED)
            && (event.is_keyboard() || event.is_pointer())
        {
            return false;
        }
        if flags.contains(WidgetFlags::HIDDEN) && event.is_pointer() {
            return false;
        }
        true
    }

    /// Runs the node's own processing: its behavior if it has one, the
    /// substrate default otherwise.
    fn process(&mut self, id: NodeId, event: &Event) -> bool {
        if let Some(mut behavior) = self.tree.take_behavior(id) {
            let consumed = behavior.event(self, id, event);
            self.tree.put_behavior(id, behavior);
            consumed
        } else {
            default_process_event(self, id, event)
        }
    }

    /// Posts a command to the bus.
    pub fn post(&mut self, command: Command) {
        self.bus.post(command);
    }

    /// Marks the subtree rooted at `id` for destruction; see
    /// [`crate::destroy::destroy`].
    pub fn destroy(&mut self, id: NodeId) {
        crate::destroy::destroy(self.tree, self.state, self.bus, self.host, id);
    }
}

/// The substrate event processing every node falls back to.
///
/// Handles Tab/Shift-Tab focus cycling on key press, and delivers command
/// events to the node's action callback. Everything else is declined.
pub fn default_process_event(cx: &mut EventCx<'_>, id: NodeId, event: &Event) -> bool {
    match event {
        Event::Key {
            key: Key::Tab,
            mods,
            down: true,
        } => {
            let dir = if mods.contains(Modifiers::SHIFT) {
                FocusDir::Backward
            } else {
                FocusDir::Forward
            };
            let root = cx.tree.root_of(id);
            let next = find_focusable(cx.tree, root, cx.state.focus(), dir);
            cx.state.set_focus(cx.tree, cx.bus, next);
            true
        }
        Event::Command(command) => {
            if let Some(mut handler) = cx.tree.take_handler(id) {
                let consumed = handler(cx, id, command);
                cx.tree.put_handler(id, handler);
                consumed
            } else {
                false
            }
        }
        _ => false,
    }
}
