// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_focus_resolver --heading-base-level=0

//! Understory Focus Resolver: deterministic directional focus search.
//!
//! Given the currently focused node, a snapshot of focusable nodes laid out in a plane,
//! and a requested [`FocusDirection`], this crate decides which single node should receive
//! focus next, or that focus should stay where it is.
//!
//! A move is resolved in three stages:
//! - **Overrides** ([`resolve_override`]): the focused node and each of its ancestors, up to
//!   the search root, may veto a direction ([`FocusOverride::Cancel`]) or redirect it to a
//!   specific node ([`FocusOverride::Target`]). The nearest scope that says anything wins.
//! - **Candidates** ([`collect_candidates`]): the focusable nodes under the search root,
//!   minus the focused node and any deactivated subtree. A container that focus is entering
//!   may substitute a single descendant for its whole subtree via an [`EnterOverride`].
//! - **Ranking** ([`FocusPolicy`], [`rank`]): the geometric protocol. Candidates must lie in
//!   the direction of travel; those in the focused node's "beam" beat those that only
//!   overlap it, which beat those outside it; within a tier the nearest wins.
//!
//! [`FocusResolver::move_focus`] ties the stages together and reports a [`MoveResult`].
//!
//! ## Minimal example
//!
//! Three buttons in a row inside a non-focusable container:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus_resolver::{FocusDirection, FocusFlags, FocusNode, FocusTree, move_focus};
//!
//! let tree = FocusTree::new([
//!     FocusNode::new(0_u32, Rect::new(0.0, 0.0, 80.0, 20.0)).with_flags(FocusFlags::empty()),
//!     FocusNode::new(1, Rect::new(0.0, 0.0, 20.0, 20.0)).with_parent(0),
//!     FocusNode::new(2, Rect::new(30.0, 0.0, 50.0, 20.0)).with_parent(0),
//!     FocusNode::new(3, Rect::new(60.0, 0.0, 80.0, 20.0)).with_parent(0),
//! ])
//! .unwrap();
//!
//! // Right from the first button lands on its nearest neighbour...
//! assert_eq!(move_focus(&tree, 0, 1, FocusDirection::Right).new_focus(), Some(2));
//! // ...and there is nothing to the left of it.
//! assert!(!move_focus(&tree, 0, 1, FocusDirection::Left).success());
//! ```
//!
//! ## Overrides
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus_resolver::{
//!     FocusDirection, FocusNode, FocusOverride, FocusOverrides, FocusTree, move_focus,
//! };
//!
//! let mut first = FocusOverrides::default();
//! // Skip the middle button when moving right from the first one.
//! first.set(FocusDirection::Right, FocusOverride::Target(3_u32));
//!
//! let tree = FocusTree::new([
//!     FocusNode::new(1, Rect::new(0.0, 0.0, 20.0, 20.0)).with_overrides(first),
//!     FocusNode::new(2, Rect::new(30.0, 0.0, 50.0, 20.0)).with_parent(1),
//!     FocusNode::new(3, Rect::new(60.0, 0.0, 80.0, 20.0)).with_parent(1),
//! ])
//! .unwrap();
//!
//! assert_eq!(move_focus(&tree, 1, 1, FocusDirection::Right).new_focus(), Some(3));
//! ```
//!
//! The core types are generic over the node identifier `K` (see [`FocusKey`]), so callers
//! can use any small, copyable, ordered handle. Geometry is expressed with [`kurbo::Rect`];
//! all nodes of one [`FocusTree`] must share a coordinate space.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo` and `tracing`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! Decisions are reported through [`tracing`] at `debug` (per move) and `trace`
//! (per candidate) levels; install a subscriber in the host to see them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Rect;

mod collect;
mod geometry;
mod linear;
mod overrides;
mod policy;
mod resolver;
mod tree;

pub use collect::collect_candidates;
pub use geometry::BeamTier;
pub use linear::WrapMode;
pub use overrides::{EnterOverride, FocusOverride, FocusOverrides, resolve_override};
pub use policy::{BeamBeatsPolicy, FocusPolicy, TieredPolicy, rank};
pub use resolver::{FocusResolver, MoveFailure, MoveResult, move_focus};
pub use tree::{Ancestors, FocusFlags, FocusNode, FocusTree, SnapshotError};

/// Direction of a focus move.
///
/// The four geometric directions drive the ranking in [`FocusPolicy`]. The logical
/// directions are resolved from the tree structure: [`Next`](Self::Next) and
/// [`Previous`](Self::Previous) follow traversal order, [`Enter`](Self::Enter) moves into
/// the focused node and [`Exit`](Self::Exit) moves out to an ancestor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Move to the next node in traversal order (for example, Tab).
    Next,
    /// Move to the previous node in traversal order (for example, Shift+Tab).
    Previous,
    /// Move up relative to the focused node.
    Up,
    /// Move down relative to the focused node.
    Down,
    /// Move left relative to the focused node.
    Left,
    /// Move right relative to the focused node.
    Right,
    /// Move into the focused node (for example, Enter on a composite widget).
    Enter,
    /// Move out of the focused node to its nearest focusable ancestor.
    Exit,
}

impl FocusDirection {
    /// Every direction, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Next,
        Self::Previous,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Enter,
        Self::Exit,
    ];

    /// Whether this is one of the four directions resolved geometrically.
    pub const fn is_geometric(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// The opposite direction.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Next => Self::Previous,
            Self::Previous => Self::Next,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Enter => Self::Exit,
            Self::Exit => Self::Enter,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Requirements on node identifiers.
///
/// `Ord` gives ranking a last-resort tie-break that does not depend on discovery order,
/// `Hash` backs the snapshot index, and `Debug` is used when tracing decisions.
/// Implemented for every type that satisfies the bounds.
pub trait FocusKey: Copy + Eq + Ord + Hash + Debug {}

impl<K> FocusKey for K where K: Copy + Eq + Ord + Hash + Debug {}

/// A node that may receive focus, with the rectangle used to rank it.
///
/// The rectangle is normally the node's own bounds. When a container substitutes a
/// descendant through an [`EnterOverride`], the candidate carries the descendant's id and
/// the container's rectangle, so that it competes where the container sits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate<K> {
    /// Identifier of the node that receives focus if this candidate wins.
    pub id: K,
    /// Bounds in the coordinate space of the surrounding [`FocusTree`].
    pub rect: Rect,
}

impl<K> Candidate<K> {
    /// Create a candidate.
    pub const fn new(id: K, rect: Rect) -> Self {
        Self { id, rect }
    }
}
