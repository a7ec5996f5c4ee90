// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate collection over a [`FocusTree`] snapshot.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::Rect;
use tracing::{debug, trace};

use crate::overrides::FocusOverride;
use crate::tree::{FocusNode, FocusTree};
use crate::{Candidate, FocusDirection, FocusKey};

/// What a container's enter override does to its subtree.
enum Substitute<'a, K> {
    /// No override; collect the subtree normally.
    None,
    /// The subtree contributes nothing.
    Cancel,
    /// The subtree contributes exactly this node.
    Target(&'a FocusNode<K>),
}

/// Collect the candidates for a move from `focused` in `direction`, searching under `root`.
///
/// - `focused` is never part of the result.
/// - A deactivated node hides itself and its subtree. A deactivated node that is, or
///   contains, the focused node (the root included) only hides itself.
/// - A node that focus is *entering* (the focused node lies outside it, or it is the focused
///   node and `direction` is [`FocusDirection::Enter`]) consults its
///   [`EnterOverride`](crate::EnterOverride) for `direction` first, even when deactivated:
///   - [`FocusOverride::Target`] naming a focusable descendant replaces the subtree by that
///     descendant, ranked at the container's rectangle. On the root it becomes the sole
///     candidate at its own rectangle.
///   - [`FocusOverride::Cancel`], or a target that is not a focusable descendant, removes
///     the subtree.
/// - Nodes whose rectangle has no area, or is not finite, are skipped but their children
///   are still visited.
///
/// The result is unordered and holds each handle at most once. Returns an empty set when
/// `root` is not in the snapshot.
pub fn collect_candidates<K: FocusKey>(
    tree: &FocusTree<K>,
    root: K,
    focused: K,
    direction: FocusDirection,
) -> Vec<Candidate<K>> {
    let Some(root_node) = tree.node(root) else {
        return Vec::new();
    };

    if is_entering(tree, root, focused, direction) {
        match enter_substitute(tree, root_node, direction) {
            Substitute::None => {}
            Substitute::Cancel => return Vec::new(),
            Substitute::Target(node) => return vec![node.candidate()],
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |id: K, rect: Rect| {
        if id != focused && has_area(rect) && seen.insert(id) {
            trace!(?id, "candidate collected");
            out.push(Candidate::new(id, rect));
        }
    };

    if root_node.can_focus() {
        push(root, root_node.rect);
    }

    let mut stack: Vec<K> = tree.children_of(root).collect();
    while let Some(id) = stack.pop() {
        let Some(node) = tree.node(id) else {
            continue;
        };

        if is_entering(tree, id, focused, direction) {
            match enter_substitute(tree, node, direction) {
                Substitute::None => {}
                Substitute::Cancel => continue,
                Substitute::Target(target) => {
                    push(target.id, node.rect);
                    continue;
                }
            }
        }

        // A deactivated node around the focused one only hides itself.
        if node.is_deactivated() && !tree.is_within(focused, id) {
            continue;
        }
        if node.can_focus() {
            push(id, node.rect);
        }
        stack.extend(tree.children_of(id));
    }

    out
}

fn is_entering<K: FocusKey>(
    tree: &FocusTree<K>,
    node: K,
    focused: K,
    direction: FocusDirection,
) -> bool {
    if node == focused {
        direction == FocusDirection::Enter
    } else {
        !tree.is_descendant(focused, node)
    }
}

fn enter_substitute<'a, K: FocusKey>(
    tree: &'a FocusTree<K>,
    container: &FocusNode<K>,
    direction: FocusDirection,
) -> Substitute<'a, K> {
    match container.overrides.enter.get(direction) {
        FocusOverride::Default => Substitute::None,
        FocusOverride::Cancel => {
            trace!(container = ?container.id, ?direction, "enter cancelled");
            Substitute::Cancel
        }
        FocusOverride::Target(target) => match tree.node(target) {
            Some(node) if node.can_focus() && tree.is_descendant(target, container.id) => {
                trace!(container = ?container.id, ?target, ?direction, "enter redirected");
                Substitute::Target(node)
            }
            _ => {
                debug!(
                    container = ?container.id,
                    ?target,
                    "enter target is not a focusable descendant"
                );
                Substitute::Cancel
            }
        },
    }
}

fn has_area(rect: Rect) -> bool {
    rect.is_finite() && !rect.is_zero_area()
}
