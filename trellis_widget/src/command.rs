// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured commands and the bus they travel on.
//!
//! Widgets communicate through named commands rather than direct calls. A
//! command carries its originating node so a receiver can tell its own
//! notifications apart from a sibling's; a name written with a leading `!`
//! escapes that and posts globally, with no origin at all.

use alloc::boxed::Box;
use alloc::string::String;

use hashbrown::HashMap;

use crate::dispatch::EventCx;
use crate::tree::Tree;
use crate::types::NodeId;

/// A typed command argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    /// Integer argument.
    Int(i64),
    /// Floating-point argument.
    Float(f64),
    /// String argument.
    Str(String),
    /// Boolean argument.
    Bool(bool),
    /// A node reference. Revalidate with [`Tree::is_alive`] before use.
    Node(NodeId),
}

/// A named notification with an optional originating node and typed
/// arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    name: String,
    origin: Option<NodeId>,
    args: HashMap<String, ArgValue>,
}

impl Command {
    /// Creates a command named `name` originating from `origin`.
    ///
    /// A leading `!` in the name marks the command global: the marker is
    /// stripped and the origin discarded.
    pub fn new(name: impl Into<String>, origin: Option<NodeId>) -> Self {
        let name = name.into();
        match name.strip_prefix('!') {
            Some(global) => Self {
                name: String::from(global),
                origin: None,
                args: HashMap::new(),
            },
            None => Self {
                name,
                origin,
                args: HashMap::new(),
            },
        }
    }

    /// Adds an argument, builder style.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: ArgValue) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// The command's name, with any global marker already stripped.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the command originated from. `None` for global commands.
    #[must_use]
    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    /// Looks up an argument by key.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&ArgValue> {
        self.args.get(key)
    }

    /// Whether the command originated from `node` or one of its descendants.
    ///
    /// Global commands are for nobody in particular; this returns `false`.
    #[must_use]
    pub fn is_for(&self, tree: &Tree, node: NodeId) -> bool {
        match self.origin {
            Some(origin) => tree.has_ancestor(origin, node),
            None => false,
        }
    }
}

/// Outbound command transport, supplied by the application layer.
///
/// The core posts commands here (focus change notifications, widget
/// actions); the application decides where they go and when they come back
/// in as [`crate::event::Event::Command`] dispatches.
pub trait CommandBus {
    /// Queues a command for delivery.
    fn post(&mut self, command: Command);
}

/// A node's action callback.
///
/// Invoked when a command event reaches the node during dispatch; returns
/// whether the command was consumed.
pub type CommandFn = Box<dyn FnMut(&mut EventCx<'_>, NodeId, &Command) -> bool>;
