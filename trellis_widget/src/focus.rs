// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus traversal.

use crate::tree::Tree;
use crate::types::{FocusDir, NodeId, WidgetFlags};

fn is_focus_candidate(tree: &Tree, id: NodeId) -> bool {
    tree.has_flags(id, WidgetFlags::FOCUSABLE)
        && tree.is_visible(id)
        && !tree.is_disabled(id)
}

/// Depth-first walk for the next candidate after `start`.
///
/// `get_next` flips when `start` is encountered; the walk returns the first
/// candidate seen after that. Hitting `start` prunes its subtree, so a
/// focused container never hands focus to its own descendants on the way
/// out.
fn next_focusable(
    tree: &Tree,
    at: NodeId,
    start: Option<NodeId>,
    get_next: &mut bool,
    dir: FocusDir,
) -> Option<NodeId> {
    if start == Some(at) {
        *get_next = true;
        return None;
    }
    if *get_next && is_focus_candidate(tree, at) {
        return Some(at);
    }
    let children = tree.children_of(at);
    match dir {
        FocusDir::Forward => {
            for &child in children {
                if let Some(found) = next_focusable(tree, child, start, get_next, dir) {
                    return Some(found);
                }
            }
        }
        FocusDir::Backward => {
            for &child in children.iter().rev() {
                if let Some(found) = next_focusable(tree, child, start, get_next, dir) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Finds the next focusable node in the tree under `root`.
///
/// With `start` set, the walk resumes after that node in `dir`'s order and
/// wraps around the tree once; with `start == None` it yields the first
/// candidate outright. Candidates must be focusable, visible, and enabled.
/// Returns `None` only when the tree holds no candidate at all.
#[must_use]
pub fn find_focusable(
    tree: &Tree,
    root: NodeId,
    start: Option<NodeId>,
    dir: FocusDir,
) -> Option<NodeId> {
    let mut get_next = start.is_none();
    let found = next_focusable(tree, root, start, &mut get_next, dir);
    if found.is_none() && start.is_some() {
        let mut get_next = true;
        return next_focusable(tree, root, None, &mut get_next, dir);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeSpec;

    fn focusable(tree: &mut Tree, parent: NodeId) -> NodeId {
        tree.add_child(
            parent,
            NodeSpec {
                flags: WidgetFlags::FOCUSABLE,
                ..NodeSpec::default()
            },
        )
    }

    #[test]
    fn forward_cycle_visits_each_once_and_wraps() {
        let mut tree = Tree::new();
        let root = tree.insert(NodeSpec::default());
        let a = focusable(&mut tree, root);
        let panel = tree.add_child(root, NodeSpec::default());
        let b = focusable(&mut tree, panel);
        let c = focusable(&mut tree, root);

        let mut at = None;
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..3 {
            at = find_focusable(&tree, root, at, FocusDir::Forward);
            seen.push(at);
        }
        assert_eq!(seen, [Some(a), Some(b), Some(c)]);
        // One more step wraps to the first candidate.
        assert_eq!(find_focusable(&tree, root, at, FocusDir::Forward), Some(a));
    }

    #[test]
    fn backward_reverses_order() {
        let mut tree = Tree::new();
        let root = tree.insert(NodeSpec::default());
        let a = focusable(&mut tree, root);
        let b = focusable(&mut tree, root);
        assert_eq!(
            find_focusable(&tree, root, None, FocusDir::Backward),
            Some(b)
        );
        assert_eq!(
            find_focusable(&tree, root, Some(b), FocusDir::Backward),
            Some(a)
        );
        assert_eq!(
            find_focusable(&tree, root, Some(a), FocusDir::Backward),
            Some(b)
        );
    }

    #[test]
    fn hidden_and_disabled_are_skipped() {
        let mut tree = Tree::new();
        let root = tree.insert(NodeSpec::default());
        let a = focusable(&mut tree, root);
        let group = tree.add_child(
            root,
            NodeSpec {
                flags: WidgetFlags::DISABLED,
                ..NodeSpec::default()
            },
        );
        let _inside = focusable(&mut tree, group);
        let hidden = focusable(&mut tree, root);
        tree.set_flags(hidden, WidgetFlags::HIDDEN, true);
        let b = focusable(&mut tree, root);

        assert_eq!(find_focusable(&tree, root, Some(a), FocusDir::Forward), Some(b));
    }

    #[test]
    fn no_candidates_yields_none() {
        let mut tree = Tree::new();
        let root = tree.insert(NodeSpec::default());
        let plain = tree.add_child(root, NodeSpec::default());
        assert_eq!(find_focusable(&tree, root, None, FocusDir::Forward), None);
        assert_eq!(
            find_focusable(&tree, root, Some(plain), FocusDir::Forward),
            None
        );
    }

    #[test]
    fn start_subtree_is_pruned() {
        let mut tree = Tree::new();
        let root = tree.insert(NodeSpec::default());
        let container = focusable(&mut tree, root);
        let _inner = focusable(&mut tree, container);
        let next = focusable(&mut tree, root);
        // Stepping out of the container skips its descendants.
        assert_eq!(
            find_focusable(&tree, root, Some(container), FocusDir::Forward),
            Some(next)
        );
    }
}
