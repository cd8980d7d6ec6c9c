// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive flag-driven arrangement.
//!
//! [`arrange`] positions and sizes a subtree in one deterministic pass,
//! reading only the layout flags and current rectangles. It allocates
//! nothing and keeps no state between passes apart from the
//! `WAS_COLLAPSED` marker.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::tree::Tree;
use crate::types::{NodeId, WidgetFlags};

/// Truncates toward zero, matching integer division of the cell sizes.
/// Shares from an even split are not redistributed; a leftover fractional
/// pixel per axis stays unused.
#[expect(
    clippy::cast_possible_truncation,
    reason = "truncation is the point; sizes are small positive values"
)]
fn trunc(v: f64) -> f64 {
    v as i64 as f64
}

fn is_collapsed(tree: &Tree, id: NodeId) -> bool {
    tree.has_flags(id, WidgetFlags::HIDDEN | WidgetFlags::COLLAPSE)
}

/// Sets the width unless the node has an explicit one.
fn set_width(tree: &mut Tree, id: NodeId, width: f64) {
    if !tree.has_flags(id, WidgetFlags::FIXED_WIDTH) {
        let size = tree.size(id);
        tree.set_size_raw(id, Size::new(width, size.height));
    }
}

/// Sets the height unless the node has an explicit one.
fn set_height(tree: &mut Tree, id: NodeId, height: f64) {
    if !tree.has_flags(id, WidgetFlags::FIXED_HEIGHT) {
        let size = tree.size(id);
        tree.set_size_raw(id, Size::new(size.width, height));
    }
}

fn expanding_count(tree: &Tree, id: NodeId) -> usize {
    tree.children_of(id)
        .iter()
        .filter(|&&child| tree.has_flags(child, WidgetFlags::EXPAND))
        .count()
}

fn widest_child(tree: &Tree, id: NodeId) -> f64 {
    tree.children_of(id)
        .iter()
        .fold(0.0, |widest, &child| widest.max(tree.size(child).width))
}

/// Local rectangle of a node relative to its parent.
fn local_rect(tree: &Tree, id: NodeId) -> Rect {
    Rect::from_origin_size(tree.pos(id), tree.size(id))
}

fn is_empty_rect(rect: Rect) -> bool {
    rect.width() <= 0.0 || rect.height() <= 0.0
}

/// Arranges the subtree rooted at `id`.
///
/// Runs the steps in order: collapse short-circuit, parent-edge snapping
/// and parent filling, child resizing (`RESIZE_CHILDREN`, expanding
/// children sharing leftover space or all children splitting evenly),
/// widest-child matching, recursive arrangement with sequential packing
/// along the arrangement axis, and finally content-driven self-sizing with
/// re-arrangement of parent-dependent children.
pub fn arrange(tree: &mut Tree, id: NodeId) {
    if is_collapsed(tree, id) {
        tree.set_flags_raw(id, WidgetFlags::WAS_COLLAPSED, true);
        return;
    }
    let flags = tree.flags(id);
    if let Some(parent) = tree.parent_of(id) {
        if flags.contains(WidgetFlags::SNAP_RIGHT_EDGE) {
            let x = tree.size(parent).width - tree.size(id).width;
            let pos = tree.pos(id);
            tree.set_pos(id, Point::new(x, pos.y));
        }
        if flags.contains(WidgetFlags::FILL_PARENT_WIDTH) {
            set_width(tree, id, tree.size(parent).width);
        }
        if flags.contains(WidgetFlags::FILL_PARENT_HEIGHT) {
            set_height(tree, id, tree.size(parent).height);
        }
    }
    // The rest of the arrangement depends on children.
    if tree.child_count(id) == 0 {
        return;
    }
    let children: Vec<NodeId> = tree.children_of(id).to_vec();
    let horizontal = flags.contains(WidgetFlags::ARRANGE_HORIZONTAL);
    let vertical = flags.contains(WidgetFlags::ARRANGE_VERTICAL);
    if flags.contains(WidgetFlags::RESIZE_CHILDREN) {
        // Collapse hidden children; restore ones collapsed last pass.
        for &child in &children {
            if is_collapsed(tree, child) {
                if horizontal {
                    set_width(tree, child, 0.0);
                }
                if vertical {
                    set_height(tree, child, 0.0);
                }
            } else if tree.has_flags(child, WidgetFlags::WAS_COLLAPSED) {
                tree.set_flags_raw(child, WidgetFlags::WAS_COLLAPSED, false);
                // Undo collapse and determine the normal size again.
                if tree.flags(child).intersects(WidgetFlags::CONTENT_SIZE) {
                    arrange(tree, child);
                }
            }
        }
        let expanding = expanding_count(tree, id);
        if expanding > 0 {
            // Only resize the expanding children, not touching the others.
            let own = tree.size(id);
            let mut avail = own;
            for &child in &children {
                if !tree.has_flags(child, WidgetFlags::EXPAND) {
                    let taken = tree.size(child);
                    avail = Size::new(avail.width - taken.width, avail.height - taken.height);
                }
            }
            let share = Size::new(
                trunc(avail.width / expanding as f64),
                trunc(avail.height / expanding as f64),
            );
            for &child in &children {
                if is_collapsed(tree, child) {
                    continue;
                }
                if tree.has_flags(child, WidgetFlags::EXPAND) {
                    if horizontal {
                        set_width(tree, child, share.width);
                        set_height(tree, child, own.height);
                    } else if vertical {
                        set_width(tree, child, own.width);
                        set_height(tree, child, share.height);
                    }
                } else {
                    // Fill the off axis, though.
                    if horizontal {
                        set_height(tree, child, own.height);
                    } else if vertical {
                        set_width(tree, child, own.width);
                    }
                }
            }
        } else {
            // Evenly size all children.
            let own = tree.size(id);
            let count = children.len() as f64;
            let cell = Size::new(
                if horizontal { trunc(own.width / count) } else { own.width },
                if vertical { trunc(own.height / count) } else { own.height },
            );
            for &child in &children {
                if !is_collapsed(tree, child) {
                    set_width(tree, child, cell.width);
                    set_height(tree, child, cell.height);
                }
            }
        }
    }
    if flags.contains(WidgetFlags::MATCH_WIDEST_CHILD) {
        let widest = widest_child(tree, id);
        for &child in &children {
            set_width(tree, child, widest);
        }
    }
    // Arrange children recursively, packing along the arrangement axis.
    let mut cursor = Point::ZERO;
    for &child in &children {
        arrange(tree, child);
        if horizontal || vertical {
            tree.set_pos(child, cursor);
            let taken = tree.size(child);
            if horizontal {
                cursor.x += taken.width;
            } else {
                cursor.y += taken.height;
            }
        }
    }
    // Update own size according to the arrangement.
    if flags.intersects(WidgetFlags::CONTENT_SIZE) {
        let mut union: Option<Rect> = None;
        for &child in &children {
            let rect = local_rect(tree, child);
            if is_empty_rect(rect) {
                continue;
            }
            union = Some(match union {
                Some(acc) => acc.union(rect),
                None => rect,
            });
        }
        let content = union.unwrap_or(Rect::ZERO);
        if flags.contains(WidgetFlags::CONTENT_WIDTH) {
            set_width(tree, id, content.width());
            // Own size changed; parent-dependent children must update.
            for &child in &children {
                if tree
                    .flags(child)
                    .intersects(WidgetFlags::FILL_PARENT_WIDTH | WidgetFlags::SNAP_RIGHT_EDGE)
                {
                    arrange(tree, child);
                }
            }
        }
        if flags.contains(WidgetFlags::CONTENT_HEIGHT) {
            set_height(tree, id, content.height());
            for &child in &children {
                if tree.has_flags(child, WidgetFlags::FILL_PARENT_HEIGHT) {
                    arrange(tree, child);
                }
            }
        }
    }
}
