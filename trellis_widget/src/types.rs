// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: node identifiers, flags, and style hints.

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` stays valid until the node is freed; after that it goes stale
/// and accessors return `None`. Slots are reused with a bumped generation, so
/// a stale id never aliases a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Independent boolean traits controlling layout, visibility,
    /// interactivity, and stacking.
    ///
    /// Layout flags are read by [`crate::layout::arrange`]; interactivity
    /// flags by the event router. `WAS_COLLAPSED` is bookkeeping written by
    /// the layout pass itself and should not be set by callers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u32 {
        /// Node is not drawn and does not receive pointer events.
        /// Keyboard events still pass through (a hidden node may hold focus).
        const HIDDEN = 1 << 0;
        /// Node receives no keyboard or pointer events.
        const DISABLED = 1 << 1;
        /// Node participates in hover tracking.
        const HOVERABLE = 1 << 2;
        /// Node can receive keyboard focus.
        const FOCUSABLE = 1 << 3;
        /// Node is in a selected state. Purely informational here.
        const SELECTED = 1 << 4;
        /// Node is dispatched and drawn ahead of the normal subtree.
        /// Set through [`crate::state::InteractState::set_flags`] so the
        /// on-top registry stays in sync.
        const KEEP_ON_TOP = 1 << 5;
        /// Width was set explicitly; automatic width layout leaves it alone.
        const FIXED_WIDTH = 1 << 6;
        /// Height was set explicitly; automatic height layout leaves it alone.
        const FIXED_HEIGHT = 1 << 7;
        /// Both size axes are explicit.
        const FIXED_SIZE = Self::FIXED_WIDTH.bits() | Self::FIXED_HEIGHT.bits();
        /// Horizontal position snaps to the parent's right edge.
        const SNAP_RIGHT_EDGE = 1 << 8;
        /// Width snaps to the parent's width (unless `FIXED_WIDTH`).
        const FILL_PARENT_WIDTH = 1 << 9;
        /// Height snaps to the parent's height (unless `FIXED_HEIGHT`).
        const FILL_PARENT_HEIGHT = 1 << 10;
        /// Children are resized along the arrangement axis.
        const RESIZE_CHILDREN = 1 << 11;
        /// Child shares leftover space evenly with other expanding siblings.
        const EXPAND = 1 << 12;
        /// Children are packed edge-to-edge along the x axis.
        const ARRANGE_HORIZONTAL = 1 << 13;
        /// Children are packed edge-to-edge along the y axis.
        const ARRANGE_VERTICAL = 1 << 14;
        /// Every child's width is set to the widest sibling's width.
        const MATCH_WIDEST_CHILD = 1 << 15;
        /// After arrangement, own width becomes the children's bounding union.
        const CONTENT_WIDTH = 1 << 16;
        /// After arrangement, own height becomes the children's bounding union.
        const CONTENT_HEIGHT = 1 << 17;
        /// Both size axes derive from the children's bounding union.
        const CONTENT_SIZE = Self::CONTENT_WIDTH.bits() | Self::CONTENT_HEIGHT.bits();
        /// Together with `HIDDEN`, the node collapses to nothing during
        /// arrangement instead of keeping its place.
        const COLLAPSE = 1 << 18;
        /// Marker recorded when a collapsed node was skipped, so a later
        /// pass can restore its normal size. Managed by the layout engine.
        const WAS_COLLAPSED = 1 << 19;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Identifier of a color in the host's palette.
///
/// The core never interprets colors; it only hands them to the
/// [`crate::paint::Painter`] collaborator. Absence of a background or frame
/// is `Option::None` on the node, not a sentinel value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColorId(pub u32);

/// Where [`crate::tree::Tree::attach`] inserts a child in its parent's list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AddPos {
    /// Prepend; the child is visited first in forward order.
    Front,
    /// Append; the child is visited last in forward order (drawn on top).
    Back,
}

/// Direction of focus cycling for [`crate::focus::find_focusable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FocusDir {
    /// Document order (pre-order depth-first).
    Forward,
    /// Reverse document order.
    Backward,
}
