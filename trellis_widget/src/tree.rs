// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget tree: an arena of nodes with parent/child links.
//!
//! The [`Tree`] owns every node. Handles ([`NodeId`]) are generational, so a
//! handle held across a node's removal goes stale instead of aliasing the
//! slot's next occupant. Structural queries on a stale handle return `None`
//! or a neutral value; structural mutations through a stale handle panic.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::command::CommandFn;
use crate::dispatch::Widget;
use crate::types::{AddPos, ColorId, NodeId, WidgetFlags};

pub(crate) struct Node {
    pub(crate) label: Option<String>,
    pub(crate) flags: WidgetFlags,
    /// Position relative to the parent's origin.
    pub(crate) pos: Point,
    pub(crate) size: Size,
    pub(crate) bg: Option<ColorId>,
    pub(crate) frame: Option<ColorId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) handler: Option<CommandFn>,
    pub(crate) behavior: Option<Box<dyn Widget>>,
}

/// Description of a node to insert, set any fields you need.
///
/// `KEEP_ON_TOP` must not be set here; it is registered through
/// [`crate::state::InteractState::set_flags`] so the on-top list stays
/// consistent.
#[derive(Default)]
pub struct NodeSpec {
    /// Optional identity for [`Tree::find_by_label`]. Not required unique.
    pub label: Option<String>,
    /// Initial flag set.
    pub flags: WidgetFlags,
    /// Position relative to the parent's origin.
    pub pos: Point,
    /// Initial size. Does not imply `FIXED_SIZE`; use [`Tree::set_size`]
    /// after insertion for that.
    pub size: Size,
    /// Background fill, or `None` for no fill.
    pub bg: Option<ColorId>,
    /// Frame outline, or `None` for no frame.
    pub frame: Option<ColorId>,
}

impl core::fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeSpec")
            .field("label", &self.label)
            .field("flags", &self.flags)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("bg", &self.bg)
            .field("frame", &self.frame)
            .finish()
    }
}

/// Arena of widget nodes.
///
/// Nodes are inserted detached and then linked with [`Tree::attach`] or
/// [`Tree::add_child`]. There is no distinguished root inside the tree;
/// whichever node the application arranges, dispatches, and draws from acts
/// as the root of its window.
#[derive(Default)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    refresh: bool,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("len", &(self.slots.len() - self.free_list.len()))
            .field("capacity", &self.slots.len())
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Whether the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1)
            && self.slots[id.idx()].is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.slots[id.idx()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.slots[id.idx()].as_mut()
    }

    /// Panicking accessor for internal use on ids already checked or owned.
    #[track_caller]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }

    #[track_caller]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }

    /// Inserts a new detached node and returns its handle.
    pub fn insert(&mut self, spec: NodeSpec) -> NodeId {
        debug_assert!(
            !spec.flags.contains(WidgetFlags::KEEP_ON_TOP),
            "KEEP_ON_TOP must be set through InteractState::set_flags"
        );
        let node = Node {
            label: spec.label,
            flags: spec.flags,
            pos: spec.pos,
            size: spec.size,
            bg: spec.bg,
            frame: spec.frame,
            parent: None,
            children: SmallVec::new(),
            handler: None,
            behavior: None,
        };
        if let Some(idx) = self.free_list.pop() {
            self.generations[idx as usize] += 1;
            self.slots[idx as usize] = Some(node);
            NodeId::new(idx, self.generations[idx as usize])
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
                panic!("node arena exceeds u32 slots");
            });
            self.slots.push(Some(node));
            self.generations.push(0);
            NodeId::new(idx, 0)
        }
    }

    /// Links a detached `child` under `parent` at the given position.
    ///
    /// # Panics
    ///
    /// If either id is stale, `child` already has a parent, `child == parent`,
    /// or the link would create a cycle.
    pub fn attach(&mut self, parent: NodeId, child: NodeId, pos: AddPos) {
        assert_ne!(parent, child, "cannot attach a node to itself");
        assert!(
            self.node(child).parent.is_none(),
            "child already attached; detach it first"
        );
        assert!(
            !self.has_ancestor(parent, child),
            "attach would create a cycle"
        );
        self.node_mut(child).parent = Some(parent);
        match pos {
            AddPos::Front => self.node_mut(parent).children.insert(0, child),
            AddPos::Back => self.node_mut(parent).children.push(child),
        }
    }

    /// Inserts a node from `spec` and attaches it at the back of `parent`.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let child = self.insert(spec);
        self.attach(parent, child, AddPos::Back);
        child
    }

    /// Unlinks `child` from its parent. The node stays alive and detached.
    ///
    /// Flags the refresh signal: the tree's appearance changed.
    ///
    /// # Panics
    ///
    /// If `child` is stale or has no parent.
    pub fn detach(&mut self, child: NodeId) {
        let parent = match self.node(child).parent {
            Some(parent) => parent,
            None => panic!("detach of a node with no parent"),
        };
        self.node_mut(child).parent = None;
        let siblings = &mut self.node_mut(parent).children;
        if let Some(at) = siblings.iter().position(|&c| c == child) {
            siblings.remove(at);
        }
        self.refresh = true;
    }

    /// Detaches the first child of `parent` (depth-first) whose label is
    /// `label`, and returns it.
    ///
    /// # Panics
    ///
    /// If no node in the subtree carries the label.
    pub fn detach_by_label(&mut self, parent: NodeId, label: &str) -> NodeId {
        match self.find_by_label(parent, label) {
            Some(found) if found != parent => {
                self.detach(found);
                found
            }
            _ => panic!("no child labeled {label:?} under {parent:?}"),
        }
    }

    /// Frees `id` and every descendant. The node must already be detached
    /// (or never attached); use [`Tree::detach`] or the destruction protocol
    /// in [`crate::destroy`] first.
    ///
    /// # Panics
    ///
    /// If `id` is stale or still has a parent.
    pub fn remove(&mut self, id: NodeId) {
        assert!(
            self.node(id).parent.is_none(),
            "remove of an attached node; detach it first"
        );
        self.free_subtree(id);
        self.refresh = true;
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            let node = match self.slots[next.idx()].take() {
                Some(node) => node,
                None => panic!("stale node id {next:?}"),
            };
            stack.extend_from_slice(&node.children);
            self.free_list.push(next.0);
        }
    }

    // --- Structural queries ---

    /// The node's parent, if attached. `None` for stale ids too.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Children in forward (insertion) order. Empty for stale ids.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Number of children. Zero for stale ids.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children_of(id).len()
    }

    /// Child at `index` in forward order, if present.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children_of(id).get(index).copied()
    }

    /// First node in the subtree of `id` (checking `id` itself first,
    /// then children depth-first in forward order) whose label is `label`.
    #[must_use]
    pub fn find_by_label(&self, id: NodeId, label: &str) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.label.as_deref() == Some(label) {
            return Some(id);
        }
        for &child in &node.children {
            if let Some(found) = self.find_by_label(child, label) {
                return Some(found);
            }
        }
        None
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    #[must_use]
    pub fn has_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(at) = cursor {
            if at == ancestor {
                return true;
            }
            cursor = self.parent_of(at);
        }
        false
    }

    /// Topmost ancestor of `id` (itself, if detached).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut at = id;
        while let Some(parent) = self.parent_of(at) {
            at = parent;
        }
        at
    }

    // --- Geometry ---

    /// Position relative to the parent's origin.
    #[must_use]
    pub fn pos(&self, id: NodeId) -> Point {
        self.get(id).map_or(Point::ZERO, |node| node.pos)
    }

    /// The node's size.
    #[must_use]
    pub fn size(&self, id: NodeId) -> Size {
        self.get(id).map_or(Size::ZERO, |node| node.size)
    }

    /// World-space rectangle: local position summed over all ancestors.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Rect {
        let size = self.size(id);
        let mut origin = Point::ZERO;
        let mut cursor = Some(id);
        while let Some(at) = cursor {
            origin += self.pos(at).to_vec2();
            cursor = self.parent_of(at);
        }
        Rect::from_origin_size(origin, size)
    }

    /// Converts a world-space point into the node's local coordinates.
    #[must_use]
    pub fn local_coord(&self, id: NodeId, point: Point) -> Point {
        let origin = self.bounds(id).origin();
        Point::new(point.x - origin.x, point.y - origin.y)
    }

    /// Whether the world-space `point` falls inside the node's bounds.
    ///
    /// Edges are half-open: the top-left corner is inside, the bottom-right
    /// corner is not.
    #[must_use]
    pub fn contains(&self, id: NodeId, point: Point) -> bool {
        let bounds = self.bounds(id);
        point.x >= bounds.x0
            && point.x < bounds.x1
            && point.y >= bounds.y0
            && point.y < bounds.y1
    }

    // --- Attributes ---

    /// The node's label, if any.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|node| node.label.as_deref())
    }

    /// Sets or clears the node's label.
    pub fn set_label(&mut self, id: NodeId, label: Option<String>) {
        self.node_mut(id).label = label;
    }

    /// The node's flag set. Empty for stale ids.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> WidgetFlags {
        self.get(id).map_or(WidgetFlags::empty(), |node| node.flags)
    }

    /// Whether the node has all of `flags` set.
    #[must_use]
    pub fn has_flags(&self, id: NodeId, flags: WidgetFlags) -> bool {
        self.flags(id).contains(flags)
    }

    /// Sets or clears `flags` without side effects.
    ///
    /// `KEEP_ON_TOP` changes must go through
    /// [`crate::state::InteractState::set_flags`] instead, which keeps the
    /// on-top registry in sync.
    pub(crate) fn set_flags_raw(&mut self, id: NodeId, flags: WidgetFlags, on: bool) {
        self.node_mut(id).flags.set(flags, on);
    }

    /// Sets or clears `flags` on the node.
    ///
    /// # Panics
    ///
    /// If `flags` includes `KEEP_ON_TOP`; that flag carries a registration
    /// side effect and is set through
    /// [`crate::state::InteractState::set_flags`].
    pub fn set_flags(&mut self, id: NodeId, flags: WidgetFlags, on: bool) {
        assert!(
            !flags.contains(WidgetFlags::KEEP_ON_TOP),
            "KEEP_ON_TOP must be set through InteractState::set_flags"
        );
        self.set_flags_raw(id, flags, on);
    }

    /// Moves the node relative to its parent's origin.
    pub fn set_pos(&mut self, id: NodeId, pos: Point) {
        self.node_mut(id).pos = pos;
    }

    /// Sets an explicit size. Marks the node `FIXED_SIZE` so automatic
    /// layout will not override either axis.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        let node = self.node_mut(id);
        node.size = size;
        node.flags.insert(WidgetFlags::FIXED_SIZE);
    }

    pub(crate) fn set_size_raw(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).size = size;
    }

    /// The node's background fill, if any.
    #[must_use]
    pub fn bg(&self, id: NodeId) -> Option<ColorId> {
        self.get(id).and_then(|node| node.bg)
    }

    /// Sets or clears the background fill.
    pub fn set_bg(&mut self, id: NodeId, bg: Option<ColorId>) {
        self.node_mut(id).bg = bg;
    }

    /// The node's frame color, if any.
    #[must_use]
    pub fn frame(&self, id: NodeId) -> Option<ColorId> {
        self.get(id).and_then(|node| node.frame)
    }

    /// Sets or clears the frame outline.
    pub fn set_frame(&mut self, id: NodeId, frame: Option<ColorId>) {
        self.node_mut(id).frame = frame;
    }

    /// Installs the node's action callback, invoked when a command event
    /// reaches it during dispatch. Returns the previous callback.
    pub fn set_handler(&mut self, id: NodeId, handler: Option<CommandFn>) -> Option<CommandFn> {
        core::mem::replace(&mut self.node_mut(id).handler, handler)
    }

    /// Installs the node's behavior, the open capability set consulted for
    /// event processing and drawing. Returns the previous behavior.
    pub fn set_behavior(
        &mut self,
        id: NodeId,
        behavior: Option<Box<dyn Widget>>,
    ) -> Option<Box<dyn Widget>> {
        core::mem::replace(&mut self.node_mut(id).behavior, behavior)
    }

    /// Temporarily lifts the handler out of the node so it can be called
    /// with the tree borrowed mutably. Pair with [`Tree::put_handler`].
    pub(crate) fn take_handler(&mut self, id: NodeId) -> Option<CommandFn> {
        self.get_mut(id).and_then(|node| node.handler.take())
    }

    /// Puts a lifted handler back, unless the node died or was given a new
    /// handler in the meantime.
    pub(crate) fn put_handler(&mut self, id: NodeId, handler: CommandFn) {
        if let Some(node) = self.get_mut(id)
            && node.handler.is_none()
        {
            node.handler = Some(handler);
        }
    }

    pub(crate) fn behavior_ref(&self, id: NodeId) -> Option<&dyn Widget> {
        self.get(id).and_then(|node| node.behavior.as_deref())
    }

    pub(crate) fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn Widget>> {
        self.get_mut(id).and_then(|node| node.behavior.take())
    }

    pub(crate) fn put_behavior(&mut self, id: NodeId, behavior: Box<dyn Widget>) {
        if let Some(node) = self.get_mut(id)
            && node.behavior.is_none()
        {
            node.behavior = Some(behavior);
        }
    }

    // --- Transitive state ---

    /// Whether the node and every ancestor are free of `HIDDEN`.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(at) = cursor {
            let Some(node) = self.get(at) else {
                return false;
            };
            if node.flags.contains(WidgetFlags::HIDDEN) {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    /// Whether the node or any ancestor carries `DISABLED`.
    #[must_use]
    pub fn is_disabled(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(at) = cursor {
            let Some(node) = self.get(at) else {
                return true;
            };
            if node.flags.contains(WidgetFlags::DISABLED) {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    /// Whether the node carries `SELECTED`.
    #[must_use]
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.has_flags(id, WidgetFlags::SELECTED)
    }

    // --- Refresh signal ---

    /// Flags that the tree's appearance changed and the window should be
    /// redrawn. Batched; drained with [`Tree::take_refresh`].
    pub fn request_refresh(&mut self) {
        self.refresh = true;
    }

    /// Drains the batched refresh signal. Returns whether a redraw was
    /// requested since the last call.
    pub fn take_refresh(&mut self) -> bool {
        core::mem::take(&mut self.refresh)
    }
}
