// src/tree/dirty.rs

//! Dirty propagation over a [`DepTree`].
//!
//! Both passes use the same strict tie-break: a child with a stamp exactly
//! equal to its parent's is not a staleness trigger; only strictly-newer
//! children dirty a parent.

use std::collections::HashSet;

use tracing::debug;

use super::node::{DepTree, NodeId};

impl DepTree {
    /// Best-effort memoized dirtiness query.
    ///
    /// A node is dirty when any immediate child is already known dirty or
    /// carries a strictly newer stamp, or when any child subtree is dirty.
    /// The traversal stops at the first violation; `known_dirty` is
    /// recorded on the node where the violation was seen and is never
    /// downgraded. For the ordered, deduplicated result use
    /// [`DepTree::collect_dirty`], which always walks the full subtree.
    pub fn is_dirty(&mut self, id: NodeId) -> bool {
        if self.node(id).known_dirty {
            return true;
        }

        let own = self.node(id).stamp;
        let children = self.node(id).children.clone();

        // Immediate children first: known dirt or a strictly newer stamp.
        for &child in &children {
            let c = self.node(child);
            if c.known_dirty || c.stamp > own {
                debug!(node = ?id, child = ?child, "immediate child violates freshness");
                self.mark_dirty(id);
                return true;
            }
        }

        // Then the subtrees.
        for &child in &children {
            if self.is_dirty(child) {
                self.mark_dirty(id);
                return true;
            }
        }

        false
    }

    /// Collect every dirty node in the subtree, children strictly before
    /// the parents that depend on them, each node at most once even when
    /// reachable through several parents.
    ///
    /// This is the authoritative propagation pass: the returned order is
    /// exactly the order a rebuild executor should apply actions in.
    /// Calling it again on an unmodified tree yields the same sequence.
    pub fn collect_dirty(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        self.collect_dirty_into(id, &mut ordered, &mut seen);
        debug!(node = ?id, dirty = ordered.len(), "collected dirty set");
        ordered
    }

    fn collect_dirty_into(
        &mut self,
        id: NodeId,
        ordered: &mut Vec<NodeId>,
        seen: &mut HashSet<NodeId>,
    ) {
        let children = self.node(id).children.clone();
        if children.is_empty() {
            // A leafless node has no staleness source of its own.
            return;
        }

        for &child in &children {
            self.collect_dirty_into(child, ordered, seen);
        }

        let own = self.node(id).stamp;
        let violated = children.iter().any(|&child| {
            let c = self.node(child);
            c.known_dirty || c.stamp > own
        });

        if violated {
            self.mark_dirty(id);
            if seen.insert(id) {
                ordered.push(id);
            }
        }
    }
}
