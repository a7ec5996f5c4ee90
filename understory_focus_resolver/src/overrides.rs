// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-scope focus overrides and their resolution along the ancestor chain.

use tracing::trace;

use crate::tree::FocusTree;
use crate::{FocusDirection, FocusKey};

/// What a scope says about one direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusOverride<K> {
    /// No opinion: defer to outer scopes and then to the default search.
    Default,
    /// Veto: a move in this direction fails, even if candidates exist.
    Cancel,
    /// Move straight to this node, skipping the geometric search.
    ///
    /// A target naming the focused node itself goes nowhere, and the move fails with
    /// [`MoveFailure::NoCandidate`](crate::MoveFailure::NoCandidate).
    Target(K),
}

impl<K> Default for FocusOverride<K> {
    fn default() -> Self {
        Self::Default
    }
}

impl<K> FocusOverride<K> {
    /// Whether this slot is empty.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Lookup table consulted when focus moves *into* a container.
///
/// Keyed by the direction of the move that enters the container. An
/// [`Exit`](FocusDirection::Exit) move never enters anything, so that slot always reads as
/// [`FocusOverride::Default`] and writes to it are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnterOverride<K> {
    slots: [FocusOverride<K>; 8],
}

impl<K> Default for EnterOverride<K> {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| FocusOverride::Default),
        }
    }
}

impl<K: Copy> EnterOverride<K> {
    /// Outcome for entering in `direction`.
    pub fn get(&self, direction: FocusDirection) -> FocusOverride<K> {
        self.slots[direction.index()]
    }

    /// Set the outcome for entering in `direction`, replacing any earlier value.
    ///
    /// Writes for [`FocusDirection::Exit`] are ignored.
    pub fn set(&mut self, direction: FocusDirection, outcome: FocusOverride<K>) {
        if direction != FocusDirection::Exit {
            self.slots[direction.index()] = outcome;
        }
    }

    /// Set the same outcome for every direction that can enter.
    pub fn set_all(&mut self, outcome: FocusOverride<K>) {
        for direction in FocusDirection::ALL {
            self.set(direction, outcome);
        }
    }

    /// Whether no direction has an outcome.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(FocusOverride::is_default)
    }
}

/// All overrides attached to one node.
///
/// Each direction is a single slot: a later [`set`](Self::set) replaces an earlier one,
/// including setting it back to [`FocusOverride::Default`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FocusOverrides<K> {
    /// Override for [`FocusDirection::Next`].
    pub next: FocusOverride<K>,
    /// Override for [`FocusDirection::Previous`].
    pub previous: FocusOverride<K>,
    /// Override for [`FocusDirection::Up`].
    pub up: FocusOverride<K>,
    /// Override for [`FocusDirection::Down`].
    pub down: FocusOverride<K>,
    /// Override for [`FocusDirection::Left`].
    pub left: FocusOverride<K>,
    /// Override for [`FocusDirection::Right`].
    pub right: FocusOverride<K>,
    /// Outcomes for moves entering this node from outside.
    pub enter: EnterOverride<K>,
}

impl<K> Default for FocusOverrides<K> {
    fn default() -> Self {
        Self {
            next: FocusOverride::Default,
            previous: FocusOverride::Default,
            up: FocusOverride::Default,
            down: FocusOverride::Default,
            left: FocusOverride::Default,
            right: FocusOverride::Default,
            enter: EnterOverride::default(),
        }
    }
}

impl<K: Copy> FocusOverrides<K> {
    /// The slot for `direction`.
    ///
    /// [`Enter`](FocusDirection::Enter) and [`Exit`](FocusDirection::Exit) have no slot and
    /// always read as [`FocusOverride::Default`].
    pub fn get(&self, direction: FocusDirection) -> FocusOverride<K> {
        match direction {
            FocusDirection::Next => self.next,
            FocusDirection::Previous => self.previous,
            FocusDirection::Up => self.up,
            FocusDirection::Down => self.down,
            FocusDirection::Left => self.left,
            FocusDirection::Right => self.right,
            FocusDirection::Enter | FocusDirection::Exit => FocusOverride::Default,
        }
    }

    /// Replace the slot for `direction`. Writes to Enter or Exit are ignored.
    pub fn set(&mut self, direction: FocusDirection, value: FocusOverride<K>) {
        let slot = match direction {
            FocusDirection::Next => &mut self.next,
            FocusDirection::Previous => &mut self.previous,
            FocusDirection::Up => &mut self.up,
            FocusDirection::Down => &mut self.down,
            FocusDirection::Left => &mut self.left,
            FocusDirection::Right => &mut self.right,
            FocusDirection::Enter | FocusDirection::Exit => return,
        };
        *slot = value;
    }
}

/// Find the override that governs a move from `focused` in `direction`.
///
/// Walks from `focused` outward through its ancestors and returns the first slot that is
/// not [`FocusOverride::Default`]. The walk never goes past `root`. Returns
/// [`FocusOverride::Default`] when no scope has an opinion, or when `focused` is not inside
/// `root`.
pub fn resolve_override<K: FocusKey>(
    tree: &FocusTree<K>,
    root: K,
    focused: K,
    direction: FocusDirection,
) -> FocusOverride<K> {
    if !tree.is_within(focused, root) {
        return FocusOverride::Default;
    }
    for scope in tree.ancestors(focused) {
        let outcome = tree
            .node(scope)
            .map_or(FocusOverride::Default, |n| n.overrides.get(direction));
        if !outcome.is_default() {
            trace!(?scope, ?direction, ?outcome, "override found");
            return outcome;
        }
        if scope == root {
            break;
        }
    }
    FocusOverride::Default
}
