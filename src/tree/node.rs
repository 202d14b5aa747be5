// src/tree/node.rs

use std::path::Path;

use anyhow::{bail, Result};

use crate::fs::{stamp_of, Freshness, Stamp};

/// Stable handle for a node in a [`DepTree`] arena.
///
/// Deduplication in `collect_dirty` is defined over these handles, not
/// over structural equality: two parents referencing the same id share one
/// node and see it propagated exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One artifact (or artifact group) in the dependency tree.
#[derive(Debug, Clone)]
pub struct DepNode {
    pub(crate) name: Option<String>,
    pub(crate) stamp: Stamp,
    pub(crate) children: Vec<NodeId>,
    pub(crate) known_dirty: bool,
}

impl DepNode {
    /// Display identifier; not required to be unique.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Cached dirtiness. Monotonic: once true it stays true for the life
    /// of the tree.
    pub fn known_dirty(&self) -> bool {
        self.known_dirty
    }
}

impl Freshness for DepNode {
    fn newest_stamp(&self) -> Result<Stamp> {
        Ok(self.stamp)
    }
}

/// Arena-backed dependency tree.
///
/// Children must already exist in the arena when a node is added, so the
/// structure cannot contain cycles; the same child id may be referenced
/// from several parents and is still propagated as a single unit.
///
/// Timestamps are fixed at node construction. Later filesystem changes
/// stay invisible until a fresh tree is built.
#[derive(Debug, Default)]
pub struct DepTree {
    nodes: Vec<DepNode>,
}

impl DepTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node with an explicit stamp.
    ///
    /// Fails on unknown child ids and on duplicate entries within one
    /// child list.
    pub fn add_node(
        &mut self,
        name: Option<String>,
        stamp: Stamp,
        children: Vec<NodeId>,
    ) -> Result<NodeId> {
        for (i, child) in children.iter().enumerate() {
            if child.0 >= self.nodes.len() {
                bail!("child id {child:?} does not exist in this tree");
            }
            if children[..i].contains(child) {
                bail!("duplicate child id {child:?} in one child list");
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(DepNode {
            name,
            stamp,
            children,
            known_dirty: false,
        });
        Ok(id)
    }

    /// Add a file-backed node: stamp snapshotted from the filesystem
    /// (`Missing` when the artifact has not been produced yet, so it is
    /// stale against any existing dependency), display name taken from the
    /// final path component.
    pub fn add_file_node(&mut self, path: &Path, children: Vec<NodeId>) -> Result<NodeId> {
        let stamp = stamp_of(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| Some(path.display().to_string()));
        self.add_node(name, stamp, children)
    }

    /// Add a synthetic root: nameless, `Infinite` stamp, never dirty on
    /// its own account — only via its children.
    pub fn add_virtual_root(&mut self, children: Vec<NodeId>) -> Result<NodeId> {
        self.add_node(None, Stamp::Infinite, children)
    }

    /// Borrow a node. Panics on a handle from a different tree; handles
    /// are only valid for the arena that issued them.
    pub fn node(&self, id: NodeId) -> &DepNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut DepNode {
        &mut self.nodes[id.0]
    }

    /// Explicit exogenous staleness mark. Monotonic: there is no way to
    /// clear it short of rebuilding the tree.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.nodes[id.0].known_dirty = true;
    }
}
