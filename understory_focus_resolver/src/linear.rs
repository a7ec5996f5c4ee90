// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear traversal for [`Next`](crate::FocusDirection::Next),
//! [`Previous`](crate::FocusDirection::Previous) and [`Enter`](crate::FocusDirection::Enter).

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::policy::reading_order;
use crate::tree::FocusTree;
use crate::{Candidate, FocusKey};

/// Wrap mode configuration for linear traversal.
///
/// Decides whether [`Next`](crate::FocusDirection::Next) and
/// [`Previous`](crate::FocusDirection::Previous) wrap around within the search root or
/// stop at the edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the sequence yields no candidate.
    Never,
    /// Wrap within the search root.
    #[default]
    Scope,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Forward,
    Backward,
}

/// Sort `candidates` into traversal order.
///
/// Explicit [`order`](crate::FocusNode::order) keys come first, ascending; the rest follow
/// in reading order. The key of a substituted candidate is the one of the node it names.
pub(crate) fn sort_linear<K: FocusKey>(tree: &FocusTree<K>, candidates: &mut [Candidate<K>]) {
    let order = |c: &Candidate<K>| tree.node(c.id).and_then(|n| n.order);
    candidates.sort_by(|a, b| compare_linear(order(a), a, order(b), b));
}

fn compare_linear<K: FocusKey>(
    a_order: Option<i32>,
    a: &Candidate<K>,
    b_order: Option<i32>,
    b: &Candidate<K>,
) -> Ordering {
    match (a_order, b_order) {
        (Some(ao), Some(bo)) => ao.cmp(&bo).then_with(|| reading_order(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => reading_order(a, b),
    }
}

/// Step from `origin` through `candidates`, which must contain `origin` for a relative step.
///
/// When `origin` is absent the first (or last) entry is returned. Never returns `origin`.
pub(crate) fn next_linear<K: FocusKey>(
    tree: &FocusTree<K>,
    origin: K,
    mut candidates: Vec<Candidate<K>>,
    wrap: WrapMode,
    step: Step,
) -> Option<K> {
    if candidates.is_empty() {
        return None;
    }
    sort_linear(tree, &mut candidates);
    let last = candidates.len() - 1;
    let origin_pos = candidates.iter().position(|c| c.id == origin);

    let pos = match (step, origin_pos) {
        (Step::Forward, Some(pos)) if pos < last => pos + 1,
        (Step::Backward, Some(pos)) if pos > 0 => pos - 1,
        (_, Some(_)) if wrap == WrapMode::Never => return None,
        (Step::Forward, _) => 0,
        (Step::Backward, _) => last,
    };
    let id = candidates[pos].id;
    (id != origin).then_some(id)
}
