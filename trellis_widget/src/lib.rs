// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widget: a retained-mode widget tree core.
//!
//! Trellis Widget is the substrate of a widget toolkit: the tree, its
//! layout, and its event plumbing, with no concrete widgets and no
//! rendering backend.
//!
//! - Represents a hierarchy of rectangular interactive nodes with
//!   per-node flags, colors, labels, and optional behaviors.
//! - Arranges a subtree in one deterministic pass driven entirely by
//!   layout flags ([`layout::arrange`]).
//! - Routes platform input through focus, hover, pointer-grab, and
//!   on-top priority lanes ([`dispatch::EventCx::dispatch`]).
//! - Defers widget destruction so a node can delete itself mid-event
//!   without invalidating the traversal ([`destroy`]).
//!
//! ## Where this fits
//!
//! Everything outward-facing is a trait the host implements:
//! [`paint::Painter`] for rendering primitives, [`state::WindowHost`] for
//! pointer capture, and [`command::CommandBus`] for the command stream
//! widgets talk over. The application owns the event loop; per frame it
//! feeds events to [`dispatch::EventCx::dispatch`], flushes marked nodes
//! with [`destroy::flush_pending`], checks [`Tree::take_refresh`], and
//! redraws with [`paint::draw`].
//!
//! ## API overview
//!
//! - [`Tree`]: arena owning every node; structure, geometry, and
//!   attribute access through generational [`NodeId`] handles.
//! - [`NodeSpec`]: per-node data for [`Tree::insert`].
//! - [`WidgetFlags`]: layout, visibility, and interactivity controls.
//! - [`InteractState`]: one window's focus/hover/grab/on-top/pending
//!   state, passed explicitly wherever it is needed.
//! - [`Widget`]: optional per-node behavior over event processing and
//!   drawing, with defaults falling through to the substrate.
//! - [`Command`]: structured name+arguments notification with an
//!   originating node.
//!
//! Key operations:
//! - [`Tree::insert`] / [`Tree::attach`] / [`Tree::detach`] / [`Tree::remove`]
//! - [`layout::arrange`] → positions and sizes a subtree.
//! - [`dispatch::EventCx::dispatch`] → offers an [`Event`] to a subtree.
//! - [`InteractState::set_focus`] / [`focus::find_focusable`] for keyboard
//!   focus movement.
//! - [`destroy::destroy`] → marks a subtree; [`destroy::flush_pending`]
//!   frees it between events.
//! - [`paint::draw`] → describes the tree to a [`paint::Painter`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod command;
pub mod destroy;
pub mod dispatch;
pub mod event;
pub mod focus;
pub mod layout;
pub mod paint;
pub mod state;
pub mod tree;
pub mod types;

#[cfg(test)]
mod testing;

pub use command::{ArgValue, Command, CommandBus, CommandFn};
pub use dispatch::{EventCx, Widget};
pub use event::{Event, Key, Modifiers, PointerButton};
pub use state::{InteractState, WindowHost};
pub use tree::{NodeSpec, Tree};
pub use types::{AddPos, ColorId, FocusDir, NodeId, WidgetFlags};
