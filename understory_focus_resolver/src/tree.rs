// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus tree snapshot: nodes, flags, and parent/child structure.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::overrides::FocusOverrides;
use crate::{Candidate, FocusKey};

bitflags::bitflags! {
    /// Per-node focus flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FocusFlags: u8 {
        /// Node can receive focus.
        const FOCUSABLE   = 0b0000_0001;
        /// Node and its subtree are out of reach for candidate collection, unless an
        /// [`EnterOverride`](crate::EnterOverride) on the node names a descendant.
        const DEACTIVATED = 0b0000_0010;
    }
}

impl Default for FocusFlags {
    fn default() -> Self {
        Self::FOCUSABLE
    }
}

/// One node of a [`FocusTree`] snapshot.
///
/// Nodes without [`FocusFlags::FOCUSABLE`] are plain grouping nodes: they never receive
/// focus themselves but can still carry overrides for their subtree.
#[derive(Clone, Debug)]
pub struct FocusNode<K> {
    /// Identifier of this node.
    pub id: K,
    /// Parent node, or `None` for a top-level node.
    pub parent: Option<K>,
    /// Bounds in the shared coordinate space of the snapshot.
    pub rect: Rect,
    /// Focusability flags.
    pub flags: FocusFlags,
    /// Optional explicit traversal key for [`FocusDirection::Next`](crate::FocusDirection::Next)
    /// and [`FocusDirection::Previous`](crate::FocusDirection::Previous).
    ///
    /// Nodes with a key come before nodes without one.
    pub order: Option<i32>,
    /// Directional and enter overrides set by application code.
    pub overrides: FocusOverrides<K>,
}

impl<K: Copy> FocusNode<K> {
    /// Create a focusable top-level node with no overrides.
    pub fn new(id: K, rect: Rect) -> Self {
        Self {
            id,
            parent: None,
            rect,
            flags: FocusFlags::default(),
            order: None,
            overrides: FocusOverrides::default(),
        }
    }

    /// Set the parent node.
    pub fn with_parent(mut self, parent: K) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: FocusFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the node (and so its subtree) as deactivated.
    pub fn deactivated(mut self) -> Self {
        self.flags |= FocusFlags::DEACTIVATED;
        self
    }

    /// Set the explicit traversal key.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Replace the overrides.
    pub fn with_overrides(mut self, overrides: FocusOverrides<K>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Whether this node may itself receive focus.
    pub fn can_focus(&self) -> bool {
        self.flags.contains(FocusFlags::FOCUSABLE) && !self.is_deactivated()
    }

    /// Whether this node is deactivated.
    pub fn is_deactivated(&self) -> bool {
        self.flags.contains(FocusFlags::DEACTIVATED)
    }

    /// This node as a ranking candidate at its own bounds.
    pub fn candidate(&self) -> Candidate<K> {
        Candidate::new(self.id, self.rect)
    }
}

/// Errors reported while building a [`FocusTree`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError<K: core::fmt::Debug> {
    /// Two nodes share the same identifier.
    #[error("duplicate focus node {0:?}")]
    DuplicateNode(K),
    /// A node names a parent that is not part of the snapshot.
    #[error("focus node {node:?} has unknown parent {parent:?}")]
    UnknownParent {
        /// The node naming the parent.
        node: K,
        /// The missing parent.
        parent: K,
    },
    /// Following parent links from this node never reaches a top-level node.
    #[error("focus node {0:?} is part of a parent cycle")]
    ParentCycle(K),
}

/// An immutable snapshot of focusable nodes and their hierarchy.
///
/// Built once per focus move by the host and read by every stage of the resolver.
/// Node order in the snapshot carries no meaning for directional search.
#[derive(Clone, Debug)]
pub struct FocusTree<K> {
    nodes: Vec<FocusNode<K>>,
    /// id → slot in `nodes`
    index: HashMap<K, usize>,
    /// child slots per slot
    children: Vec<SmallVec<[usize; 4]>>,
}

impl<K: FocusKey> FocusTree<K> {
    /// Build and validate a snapshot.
    ///
    /// Fails if an identifier repeats, a parent is missing, or parent links form a cycle.
    pub fn new(nodes: impl IntoIterator<Item = FocusNode<K>>) -> Result<Self, SnapshotError<K>> {
        let nodes: Vec<FocusNode<K>> = nodes.into_iter().collect();

        let mut index = HashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            if index.insert(node.id, slot).is_some() {
                return Err(SnapshotError::DuplicateNode(node.id));
            }
        }

        let mut children: Vec<SmallVec<[usize; 4]>> = Vec::new();
        children.resize_with(nodes.len(), SmallVec::new);
        for (slot, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                let Some(&parent_slot) = index.get(&parent) else {
                    return Err(SnapshotError::UnknownParent {
                        node: node.id,
                        parent,
                    });
                };
                children[parent_slot].push(slot);
            }
        }

        let tree = Self {
            nodes,
            index,
            children,
        };
        tree.check_acyclic()?;
        Ok(tree)
    }

    fn check_acyclic(&self) -> Result<(), SnapshotError<K>> {
        // A chain longer than the node count must revisit a node.
        for node in &self.nodes {
            let mut steps = 0;
            let mut cursor = node.parent;
            while let Some(id) = cursor {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(SnapshotError::ParentCycle(node.id));
                }
                cursor = self.node(id).and_then(|n| n.parent);
            }
        }
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is part of the snapshot.
    pub fn contains(&self, id: K) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a node.
    pub fn node(&self, id: K) -> Option<&FocusNode<K>> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// All nodes, in snapshot order.
    pub fn nodes(&self) -> &[FocusNode<K>] {
        &self.nodes
    }

    /// Parent of a node, if it has one.
    pub fn parent_of(&self, id: K) -> Option<K> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a node; empty for unknown ids.
    pub fn children_of(&self, id: K) -> impl Iterator<Item = K> + '_ {
        self.index
            .get(&id)
            .into_iter()
            .flat_map(|&slot| self.children[slot].iter())
            .map(|&child| self.nodes[child].id)
    }

    /// Iterate from `id` outward through its ancestors, starting with `id` itself.
    ///
    /// Yields nothing for unknown ids.
    pub fn ancestors(&self, id: K) -> Ancestors<'_, K> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Whether `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, node: K, ancestor: K) -> bool {
        self.ancestors(node).skip(1).any(|id| id == ancestor)
    }

    /// Whether `node` is `root` or lies below it.
    pub fn is_within(&self, node: K, root: K) -> bool {
        self.ancestors(node).any(|id| id == root)
    }
}

/// Iterator over a node and its ancestors; see [`FocusTree::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a, K> {
    tree: &'a FocusTree<K>,
    next: Option<K>,
}

impl<K: FocusKey> Iterator for Ancestors<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}
