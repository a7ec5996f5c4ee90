// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The top-level entry point tying overrides, collection and ranking together.

use alloc::vec::Vec;

use tracing::debug;

use crate::collect::collect_candidates;
use crate::linear::{Step, WrapMode, next_linear, sort_linear};
use crate::overrides::{FocusOverride, resolve_override};
use crate::policy::{FocusPolicy, TieredPolicy};
use crate::tree::{FocusNode, FocusTree};
use crate::{Candidate, FocusDirection, FocusKey};

/// Why a focus move did not happen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveFailure {
    /// An override vetoed the move.
    Cancelled,
    /// Nothing qualifies in the requested direction.
    NoCandidate,
    /// The focused node or the search root is not in the snapshot, or the focused node is
    /// not inside the root.
    StaleFocus,
    /// An override named a node that is gone, cannot take focus, or lies outside the root.
    StaleTarget,
}

/// Outcome of [`FocusResolver::move_focus`].
///
/// A failed move leaves focus where it was; the caller keeps its current node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveResult<K> {
    /// Focus should move to this node.
    Moved(K),
    /// Focus stays put.
    Failed(MoveFailure),
}

impl<K: Copy> MoveResult<K> {
    /// Whether focus moved.
    pub fn success(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// The newly focused node, if focus moved.
    pub fn new_focus(&self) -> Option<K> {
        match *self {
            Self::Moved(id) => Some(id),
            Self::Failed(_) => None,
        }
    }

    /// The reason focus did not move, if it did not.
    pub fn failure(&self) -> Option<MoveFailure> {
        match *self {
            Self::Moved(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Resolver configuration: the geometric ranking policy and linear wrap behavior.
///
/// The default uses [`TieredPolicy`] and wraps within the search root.
#[derive(Copy, Clone, Debug, Default)]
pub struct FocusResolver<P = TieredPolicy> {
    /// Ranking used for the four geometric directions.
    pub policy: P,
    /// Wrap behavior for [`Next`](FocusDirection::Next) and
    /// [`Previous`](FocusDirection::Previous).
    pub wrap: WrapMode,
}

impl<P> FocusResolver<P> {
    /// Create a resolver with a custom ranking policy and the default wrap mode.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            wrap: WrapMode::default(),
        }
    }

    /// Replace the wrap mode.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Decide where focus goes when moving from `focused` in `direction`, searching the
    /// subtree under `root`.
    ///
    /// - [`Enter`](FocusDirection::Enter) picks the focused node's enter override, or
    ///   otherwise its first focusable descendant in traversal order.
    /// - [`Exit`](FocusDirection::Exit) picks the nearest focusable ancestor, up to `root`.
    ///   Exiting `root` itself fails.
    /// - Every other direction consults [`resolve_override`] first. A veto fails the move
    ///   and a target wins outright, unless it names `focused`. Without an override,
    ///   geometric directions rank the collected candidates with [`policy`](Self::policy),
    ///   and [`Next`](FocusDirection::Next)/[`Previous`](FocusDirection::Previous) step
    ///   through them in traversal order.
    pub fn move_focus<K>(
        &self,
        tree: &FocusTree<K>,
        root: K,
        focused: K,
        direction: FocusDirection,
    ) -> MoveResult<K>
    where
        K: FocusKey,
        P: FocusPolicy<K>,
    {
        let result = self.resolve(tree, root, focused, direction);
        debug!(?focused, ?root, ?direction, ?result, "focus move resolved");
        result
    }

    fn resolve<K>(
        &self,
        tree: &FocusTree<K>,
        root: K,
        focused: K,
        direction: FocusDirection,
    ) -> MoveResult<K>
    where
        K: FocusKey,
        P: FocusPolicy<K>,
    {
        let Some(focused_node) = tree.node(focused) else {
            return MoveResult::Failed(MoveFailure::StaleFocus);
        };
        if !tree.is_within(focused, root) {
            return MoveResult::Failed(MoveFailure::StaleFocus);
        }

        match direction {
            FocusDirection::Enter => return enter(tree, focused_node),
            FocusDirection::Exit => return exit(tree, root, focused),
            _ => {}
        }

        match resolve_override(tree, root, focused, direction) {
            FocusOverride::Default => {}
            FocusOverride::Cancel => return MoveResult::Failed(MoveFailure::Cancelled),
            FocusOverride::Target(target) if target == focused => {
                return MoveResult::Failed(MoveFailure::NoCandidate);
            }
            FocusOverride::Target(target) => {
                let live = tree.node(target).is_some_and(FocusNode::can_focus);
                if live && tree.is_within(target, root) {
                    return MoveResult::Moved(target);
                }
                debug!(?target, "override target is not focusable");
                return MoveResult::Failed(MoveFailure::StaleTarget);
            }
        }

        let mut candidates = collect_candidates(tree, root, focused, direction);
        let next = match direction {
            FocusDirection::Next | FocusDirection::Previous => {
                candidates.push(focused_node.candidate());
                let step = if direction == FocusDirection::Next {
                    Step::Forward
                } else {
                    Step::Backward
                };
                next_linear(tree, focused, candidates, self.wrap, step)
            }
            _ => self
                .policy
                .best_candidate(focused_node.rect, direction, &candidates)
                .map(|c| c.id),
        };
        next.map_or(MoveResult::Failed(MoveFailure::NoCandidate), MoveResult::Moved)
    }
}

/// Resolve a move with the default [`FocusResolver`].
pub fn move_focus<K: FocusKey>(
    tree: &FocusTree<K>,
    root: K,
    focused: K,
    direction: FocusDirection,
) -> MoveResult<K> {
    FocusResolver::<TieredPolicy>::default().move_focus(tree, root, focused, direction)
}

fn enter<K: FocusKey>(tree: &FocusTree<K>, focused: &FocusNode<K>) -> MoveResult<K> {
    match focused.overrides.enter.get(FocusDirection::Enter) {
        FocusOverride::Cancel => return MoveResult::Failed(MoveFailure::Cancelled),
        FocusOverride::Target(target) => {
            let live = tree.node(target).is_some_and(FocusNode::can_focus);
            if live && tree.is_descendant(target, focused.id) {
                return MoveResult::Moved(target);
            }
            debug!(?target, "enter target is not a focusable descendant");
            return MoveResult::Failed(MoveFailure::StaleTarget);
        }
        FocusOverride::Default => {}
    }

    let mut candidates: Vec<Candidate<K>> =
        collect_candidates(tree, focused.id, focused.id, FocusDirection::Enter);
    sort_linear(tree, &mut candidates);
    candidates
        .first()
        .map_or(MoveResult::Failed(MoveFailure::NoCandidate), |c| {
            MoveResult::Moved(c.id)
        })
}

fn exit<K: FocusKey>(tree: &FocusTree<K>, root: K, focused: K) -> MoveResult<K> {
    // The root's own ancestors lie outside the search scope.
    if focused == root {
        return MoveResult::Failed(MoveFailure::NoCandidate);
    }
    for id in tree.ancestors(focused).skip(1) {
        if tree.node(id).is_some_and(FocusNode::can_focus) {
            return MoveResult::Moved(id);
        }
        if id == root {
            break;
        }
    }
    MoveResult::Failed(MoveFailure::NoCandidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FocusDirection::{Down, Enter, Exit, Left, Next, Previous, Right, Up};
    use crate::overrides::FocusOverrides;
    use crate::policy::BeamBeatsPolicy;
    use crate::tree::FocusFlags;
    use alloc::vec;
    use kurbo::Rect;

    fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    fn sq(x: f64, y: f64) -> Rect {
        r(x, y, 20.0, 20.0)
    }

    fn group(id: u32, rect: Rect) -> FocusNode<u32> {
        FocusNode::new(id, rect).with_flags(FocusFlags::empty())
    }

    fn tree(nodes: Vec<FocusNode<u32>>) -> FocusTree<u32> {
        FocusTree::new(nodes).unwrap()
    }

    fn set(
        node: FocusNode<u32>,
        direction: FocusDirection,
        value: FocusOverride<u32>,
    ) -> FocusNode<u32> {
        let mut overrides = node.overrides.clone();
        overrides.set(direction, value);
        node.with_overrides(overrides)
    }

    /// Three items in a row under a plain group: 1 at x=0, 2 at x=30, 3 at x=60.
    fn row() -> Vec<FocusNode<u32>> {
        vec![
            group(0, r(0.0, 0.0, 80.0, 20.0)),
            FocusNode::new(1, sq(0.0, 0.0)).with_parent(0),
            FocusNode::new(2, sq(30.0, 0.0)).with_parent(0),
            FocusNode::new(3, sq(60.0, 0.0)).with_parent(0),
        ]
    }

    #[test]
    fn nearest_in_beam_candidate_wins() {
        let tree = tree(row());
        assert_eq!(move_focus(&tree, 0, 1, Right), MoveResult::Moved(2));
        assert_eq!(move_focus(&tree, 0, 3, Left), MoveResult::Moved(2));
    }

    #[test]
    fn nothing_in_the_direction_fails() {
        let tree = tree(row());
        let result = move_focus(&tree, 0, 1, Left);
        assert!(!result.success());
        assert_eq!(result.new_focus(), None);
        assert_eq!(result.failure(), Some(MoveFailure::NoCandidate));

        let alone = self::tree(vec![FocusNode::new(1, sq(0.0, 0.0))]);
        for direction in [Up, Down, Left, Right, Next, Previous, Enter, Exit] {
            assert_eq!(
                move_focus(&alone, 1, 1, direction),
                MoveResult::Failed(MoveFailure::NoCandidate),
                "{direction:?}"
            );
        }
    }

    #[test]
    fn veto_beats_available_candidates() {
        let mut nodes = row();
        nodes[0] = set(nodes[0].clone(), Right, FocusOverride::Cancel);
        let tree = tree(nodes);
        assert_eq!(
            move_focus(&tree, 0, 1, Right),
            MoveResult::Failed(MoveFailure::Cancelled)
        );
        // Other directions are unaffected.
        assert_eq!(move_focus(&tree, 0, 3, Left), MoveResult::Moved(2));
    }

    #[test]
    fn nearest_scope_override_wins() {
        let mut nodes = row();
        nodes[0] = set(nodes[0].clone(), Right, FocusOverride::Cancel);
        nodes[1] = set(nodes[1].clone(), Right, FocusOverride::Target(3));
        let tree = tree(nodes);
        assert_eq!(move_focus(&tree, 0, 1, Right), MoveResult::Moved(3));
        assert_eq!(
            move_focus(&tree, 0, 2, Right),
            MoveResult::Failed(MoveFailure::Cancelled)
        );
    }

    #[test]
    fn cleared_override_falls_back_to_geometry() {
        let mut overrides = FocusOverrides::default();
        overrides.set(Right, FocusOverride::Cancel);
        overrides.set(Right, FocusOverride::Default);
        let mut nodes = row();
        nodes[0] = nodes[0].clone().with_overrides(overrides);
        let tree = tree(nodes);
        assert_eq!(move_focus(&tree, 0, 1, Right), MoveResult::Moved(2));
    }

    #[test]
    fn stale_override_target_fails() {
        let mut nodes = row();
        nodes[1] = set(nodes[1].clone(), Right, FocusOverride::Target(42));
        nodes[2] = set(nodes[2].clone(), Right, FocusOverride::Target(0));
        nodes.push(FocusNode::new(4, sq(90.0, 0.0)).deactivated().with_parent(0));
        nodes[3] = set(nodes[3].clone(), Right, FocusOverride::Target(4));
        let tree = tree(nodes);
        let stale = MoveResult::Failed(MoveFailure::StaleTarget);
        // Unknown node.
        assert_eq!(move_focus(&tree, 0, 1, Right), stale);
        // Not focusable.
        assert_eq!(move_focus(&tree, 0, 2, Right), stale);
        // Deactivated.
        assert_eq!(move_focus(&tree, 0, 3, Right), stale);
    }

    #[test]
    fn override_target_outside_root_is_stale() {
        let mut nodes = row();
        nodes.push(FocusNode::new(9, sq(0.0, 100.0)));
        nodes[1] = set(nodes[1].clone(), Down, FocusOverride::Target(9));
        let tree = tree(nodes);
        assert_eq!(
            move_focus(&tree, 0, 1, Down),
            MoveResult::Failed(MoveFailure::StaleTarget)
        );
    }

    #[test]
    fn stale_focus_fails() {
        let mut nodes = row();
        nodes.push(FocusNode::new(9, sq(0.0, 100.0)));
        let tree = tree(nodes);
        let stale = MoveResult::Failed(MoveFailure::StaleFocus);
        assert_eq!(move_focus(&tree, 0, 42, Right), stale);
        assert_eq!(move_focus(&tree, 42, 1, Right), stale);
        assert_eq!(move_focus(&tree, 0, 9, Up), stale);
    }

    #[test]
    fn enter_override_picks_child_regardless_of_geometry() {
        // A container on the left holding two children; focus sits to its right.
        let container = FocusNode::new(10, r(0.0, 0.0, 100.0, 40.0)).with_parent(0);
        let mut overrides = FocusOverrides::default();
        overrides.enter.set(Left, FocusOverride::Target(11));
        let tree = tree(vec![
            group(0, r(0.0, 0.0, 200.0, 40.0)),
            container.with_overrides(overrides),
            FocusNode::new(11, sq(0.0, 10.0)).with_parent(10),
            FocusNode::new(12, sq(70.0, 10.0)).with_parent(10),
            FocusNode::new(20, sq(150.0, 10.0)).with_parent(0),
        ]);
        assert_eq!(move_focus(&tree, 0, 20, Left), MoveResult::Moved(11));
    }

    #[test]
    fn focus_right_reaches_sibling_of_parent() {
        // 1 ── 2 ── 3 (focused)
        //  └── 4
        let tree = tree(vec![
            FocusNode::new(1, r(0.0, 0.0, 100.0, 30.0)),
            FocusNode::new(2, r(0.0, 0.0, 40.0, 30.0)).with_parent(1),
            FocusNode::new(3, sq(10.0, 5.0)).with_parent(2),
            FocusNode::new(4, sq(60.0, 5.0)).with_parent(1),
        ]);
        assert_eq!(move_focus(&tree, 1, 3, Right), MoveResult::Moved(4));
    }

    #[test]
    fn deactivated_sibling_is_skipped() {
        let mut nodes = row();
        nodes[2] = nodes[2].clone().deactivated();
        let tree = tree(nodes);
        assert_eq!(move_focus(&tree, 0, 1, Right), MoveResult::Moved(3));
    }

    #[test]
    fn next_and_previous_follow_traversal_order() {
        let tree = tree(row());
        assert_eq!(move_focus(&tree, 0, 1, Next), MoveResult::Moved(2));
        assert_eq!(move_focus(&tree, 0, 3, Next), MoveResult::Moved(1));
        assert_eq!(move_focus(&tree, 0, 1, Previous), MoveResult::Moved(3));

        let no_wrap = FocusResolver::<TieredPolicy>::default().with_wrap(WrapMode::Never);
        assert_eq!(
            no_wrap.move_focus(&tree, 0, 3, Next),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
        assert_eq!(no_wrap.move_focus(&tree, 0, 3, Previous), MoveResult::Moved(2));
    }

    #[test]
    fn next_and_previous_honor_overrides() {
        let mut nodes = row();
        nodes[1] = set(nodes[1].clone(), Next, FocusOverride::Target(3));
        nodes[0] = set(nodes[0].clone(), Previous, FocusOverride::Cancel);
        let tree = tree(nodes);
        assert_eq!(move_focus(&tree, 0, 1, Next), MoveResult::Moved(3));
        assert_eq!(move_focus(&tree, 0, 2, Next), MoveResult::Moved(3));
        assert_eq!(
            move_focus(&tree, 0, 2, Previous),
            MoveResult::Failed(MoveFailure::Cancelled)
        );
    }

    #[test]
    fn enter_moves_to_first_descendant() {
        let tree = tree(vec![
            FocusNode::new(1, r(0.0, 0.0, 100.0, 100.0)),
            FocusNode::new(2, sq(50.0, 10.0)).with_parent(1),
            FocusNode::new(3, sq(10.0, 10.0)).with_parent(1),
            FocusNode::new(4, sq(10.0, 50.0)).with_parent(1),
        ]);
        assert_eq!(move_focus(&tree, 1, 1, Enter), MoveResult::Moved(3));
        assert_eq!(
            move_focus(&tree, 1, 3, Enter),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
    }

    #[test]
    fn enter_uses_the_focused_node_override() {
        let mut overrides = FocusOverrides::default();
        overrides.enter.set(Enter, FocusOverride::Target(4));
        let container = FocusNode::new(1, r(0.0, 0.0, 100.0, 100.0));
        let nodes = vec![
            container.clone().with_overrides(overrides.clone()),
            FocusNode::new(3, sq(10.0, 10.0)).with_parent(1),
            FocusNode::new(4, sq(10.0, 50.0)).with_parent(1),
        ];
        assert_eq!(
            move_focus(&tree(nodes.clone()), 1, 1, Enter),
            MoveResult::Moved(4)
        );

        overrides.enter.set(Enter, FocusOverride::Cancel);
        let mut cancelled = nodes.clone();
        cancelled[0] = container.clone().with_overrides(overrides.clone());
        assert_eq!(
            move_focus(&tree(cancelled), 1, 1, Enter),
            MoveResult::Failed(MoveFailure::Cancelled)
        );

        // A target outside the container is refused.
        overrides.enter.set(Enter, FocusOverride::Target(1));
        let mut stale = nodes;
        stale[0] = container.with_overrides(overrides);
        assert_eq!(
            move_focus(&tree(stale), 1, 1, Enter),
            MoveResult::Failed(MoveFailure::StaleTarget)
        );
    }

    /// 1 ── 2 ── 3 ── 4 (focused), for exit tests.
    fn exit_chain(deactivate: &[u32]) -> FocusTree<u32> {
        let nodes = (1..=4_u32).map(|id| {
            let node = FocusNode::new(id, r(0.0, 0.0, 100.0 / f64::from(id), 100.0));
            let node = if id > 1 { node.with_parent(id - 1) } else { node };
            if deactivate.contains(&id) {
                node.deactivated()
            } else {
                node
            }
        });
        FocusTree::new(nodes).unwrap()
    }

    #[test]
    fn exit_moves_to_parent() {
        assert_eq!(move_focus(&exit_chain(&[]), 1, 4, Exit), MoveResult::Moved(3));
    }

    #[test]
    fn exit_skips_deactivated_parents() {
        assert_eq!(
            move_focus(&exit_chain(&[2, 3]), 1, 4, Exit),
            MoveResult::Moved(1)
        );
    }

    #[test]
    fn exit_fails_when_every_ancestor_is_deactivated() {
        assert_eq!(
            move_focus(&exit_chain(&[1, 2, 3]), 1, 4, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
    }

    #[test]
    fn exit_stops_at_the_root() {
        assert_eq!(
            move_focus(&exit_chain(&[3]), 3, 4, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
        assert_eq!(
            move_focus(&exit_chain(&[]), 1, 1, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
    }

    #[test]
    fn exit_from_the_root_stays_in_scope() {
        // 1 ── 2 ── 3 ── 4, all focusable, searching under 2.
        let tree = exit_chain(&[]);
        assert_eq!(
            move_focus(&tree, 2, 2, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
        assert_eq!(move_focus(&tree, 2, 3, Exit), MoveResult::Moved(2));
    }

    #[test]
    fn logical_moves_stay_inside_a_nested_root() {
        // 1 ── 2 ── 3, 4
        //  └── 5
        let tree = tree(vec![
            FocusNode::new(1, r(0.0, 0.0, 200.0, 100.0)),
            FocusNode::new(2, r(0.0, 0.0, 100.0, 50.0)).with_parent(1),
            FocusNode::new(3, sq(10.0, 10.0)).with_parent(2),
            FocusNode::new(4, sq(60.0, 10.0)).with_parent(2),
            FocusNode::new(5, sq(150.0, 10.0)).with_parent(1),
        ]);
        assert_eq!(
            move_focus(&tree, 2, 2, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
        assert_eq!(move_focus(&tree, 2, 2, Enter), MoveResult::Moved(3));
        // Wrapping comes back to the root itself, never to 1 or 5.
        assert_eq!(move_focus(&tree, 2, 4, Next), MoveResult::Moved(2));
        assert_eq!(move_focus(&tree, 2, 2, Previous), MoveResult::Moved(4));
        assert_eq!(
            move_focus(&tree, 2, 4, Right),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
        // Without the nested root, 5 is reachable.
        assert_eq!(move_focus(&tree, 1, 4, Right), MoveResult::Moved(5));
    }

    #[test]
    fn siblings_inside_a_deactivated_parent_stay_reachable() {
        let tree = tree(vec![
            group(0, r(0.0, 0.0, 100.0, 100.0)),
            FocusNode::new(1, r(0.0, 0.0, 100.0, 50.0))
                .with_parent(0)
                .deactivated(),
            FocusNode::new(2, r(0.0, 10.0, 20.0, 10.0)).with_parent(1),
            FocusNode::new(3, r(0.0, 30.0, 20.0, 10.0)).with_parent(1),
        ]);
        assert_eq!(move_focus(&tree, 0, 2, Down), MoveResult::Moved(3));
        assert_eq!(move_focus(&tree, 0, 2, Next), MoveResult::Moved(3));
        assert_eq!(move_focus(&tree, 0, 3, Up), MoveResult::Moved(2));
        // The parent itself never takes focus.
        assert_eq!(
            move_focus(&tree, 0, 2, Exit),
            MoveResult::Failed(MoveFailure::NoCandidate)
        );
    }

    #[test]
    fn override_targeting_the_focused_node_goes_nowhere() {
        let mut nodes = row();
        nodes[2] = set(nodes[2].clone(), Right, FocusOverride::Target(2));
        let tree = tree(nodes);
        let result = move_focus(&tree, 0, 2, Right);
        assert!(!result.success());
        assert_eq!(result, MoveResult::Failed(MoveFailure::NoCandidate));
    }

    #[test]
    fn resolver_uses_the_configured_policy() {
        // An in-beam item far below versus an off-beam one close below.
        let tree = tree(vec![
            group(0, r(0.0, 0.0, 200.0, 200.0)),
            FocusNode::new(1, sq(0.0, 0.0)).with_parent(0),
            FocusNode::new(2, sq(30.0, 30.0)).with_parent(0),
            FocusNode::new(3, r(0.0, 150.0, 20.0, 20.0)).with_parent(0),
        ]);
        let tiered = FocusResolver::new(TieredPolicy);
        let beam_beats = FocusResolver::new(BeamBeatsPolicy);
        // 2 is outside the beam (x 30..50 against 0..20); 3 is in it.
        assert_eq!(tiered.move_focus(&tree, 0, 1, Down), MoveResult::Moved(3));
        assert_eq!(beam_beats.move_focus(&tree, 0, 1, Down), MoveResult::Moved(2));
    }
}
