// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events fed into the dispatcher.
//!
//! The platform layer translates its native events into this small set.
//! Coordinates are window-relative, matching the world space of
//! [`crate::tree::Tree::bounds`].

use alloc::string::String;

use kurbo::{Point, Vec2};

use crate::command::Command;

/// A pointer button.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerButton {
    /// The primary button, usually left.
    Primary,
    /// The secondary button, usually right.
    Secondary,
    /// The middle button or wheel press.
    Middle,
}

/// A key identity, independent of layout concerns the core does not have.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// Tab, used by the default handler for focus cycling.
    Tab,
    /// Escape.
    Escape,
    /// Enter/Return.
    Enter,
    /// Space bar.
    Space,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// A printable character key.
    Char(char),
}

bitflags::bitflags! {
    /// Keyboard modifier state accompanying a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift held.
        const SHIFT = 1 << 0;
        /// Control held.
        const CTRL = 1 << 1;
        /// Alt/Option held.
        const ALT = 1 << 2;
    }
}

/// An event offered to the tree through [`crate::dispatch::EventCx::dispatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The pointer moved to a window-relative position.
    PointerMove {
        /// New pointer position.
        pos: Point,
    },
    /// A pointer button went down or up.
    PointerButton {
        /// Pointer position at the time of the press.
        pos: Point,
        /// Which button.
        button: PointerButton,
        /// `true` on press, `false` on release.
        down: bool,
    },
    /// The scroll wheel or trackpad moved.
    Scroll {
        /// Scroll delta in window units.
        delta: Vec2,
    },
    /// A key went down or up.
    Key {
        /// Which key.
        key: Key,
        /// Modifier state.
        mods: Modifiers,
        /// `true` on press, `false` on release.
        down: bool,
    },
    /// Committed text input.
    Text {
        /// The committed text.
        text: String,
    },
    /// A command coming back in from the bus for delivery to handlers.
    Command(Command),
}

impl Event {
    /// Whether the event routes with keyboard priority (focus first).
    #[must_use]
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::Key { .. } | Self::Text { .. })
    }

    /// Whether the event routes by pointer position.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerMove { .. } | Self::PointerButton { .. } | Self::Scroll { .. }
        )
    }

    /// The pointer position, for pointer events.
    #[must_use]
    pub fn pointer_pos(&self) -> Option<Point> {
        match self {
            Self::PointerMove { pos } | Self::PointerButton { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_classes() {
        let mv = Event::PointerMove {
            pos: Point::new(1.0, 2.0),
        };
        assert!(mv.is_pointer());
        assert!(!mv.is_keyboard());
        assert_eq!(mv.pointer_pos(), Some(Point::new(1.0, 2.0)));

        let key = Event::Key {
            key: Key::Tab,
            mods: Modifiers::empty(),
            down: true,
        };
        assert!(key.is_keyboard());
        assert!(!key.is_pointer());
        assert_eq!(key.pointer_pos(), None);

        let scroll = Event::Scroll {
            delta: Vec2::new(0.0, -3.0),
        };
        assert!(scroll.is_pointer());
        assert_eq!(scroll.pointer_pos(), None);
    }
}
