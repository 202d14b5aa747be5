// src/tree/materialize.rs

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::debug;

use super::node::{DepTree, NodeId};
use crate::fs::Workspace;
use crate::pattern::expand_pattern;
use crate::spec::{AggregateSpec, SpecEntry};

/// Declarative description of a dependency tree.
///
/// A mapping names an artifact and describes its dependencies, a list
/// holds sibling descriptions grafted onto the same parent, and a bare
/// string is a pattern leaf resolved against the workspace. A missing
/// value under a key (an empty table, in TOML) means the artifact has no
/// dependencies.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeSpec {
    /// Wildcard leaf, e.g. `"c*"`.
    Pattern(String),
    /// Ordered sibling descriptions for one parent.
    List(Vec<TreeSpec>),
    /// Artifact name to its dependency description.
    Map(BTreeMap<String, Option<TreeSpec>>),
}

/// Options controlling materialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializeOptions {
    /// Keep each pattern leaf as a single aggregate node carrying the
    /// newest stamp of its matched set, instead of one leaf per matched
    /// file.
    pub aggregate_leaves: bool,
}

/// Materialize a declarative description into a [`DepTree`].
///
/// A single-entry top-level map makes that entry the root directly; a
/// wider map or a top-level list gets a synthetic virtual root that is
/// never dirty on its own account. A description with no top-level entry
/// has no root to give and fails.
pub fn materialize(
    spec: &TreeSpec,
    workspace: &Workspace,
    options: MaterializeOptions,
) -> Result<(DepTree, NodeId)> {
    let mut tree = DepTree::new();

    let root = match spec {
        TreeSpec::Map(map) if map.is_empty() => {
            bail!("dependency description has no top-level entries")
        }
        TreeSpec::List(items) if items.is_empty() => {
            bail!("dependency description has no top-level entries")
        }
        TreeSpec::Map(map) if map.len() == 1 => {
            // The sole top-level name *is* the root; no synthetic wrapper.
            match graft(&mut tree, spec, workspace, options)?.into_iter().next() {
                Some(id) => id,
                None => bail!("dependency description has no top-level entries"),
            }
        }
        _ => {
            let children = graft(&mut tree, spec, workspace, options)?;
            tree.add_virtual_root(children)?
        }
    };

    debug!(nodes = tree.len(), root = ?root, "dependency tree materialized");
    Ok((tree, root))
}

/// Build arena nodes for one description level, returning the ids to
/// graft onto the parent. Children are created before their parent so the
/// arena's no-forward-reference rule holds.
fn graft(
    tree: &mut DepTree,
    spec: &TreeSpec,
    workspace: &Workspace,
    options: MaterializeOptions,
) -> Result<Vec<NodeId>> {
    match spec {
        TreeSpec::Map(map) => {
            let mut ids = Vec::with_capacity(map.len());
            for (name, deps) in map {
                let children = match deps {
                    Some(sub) => graft(tree, sub, workspace, options)?,
                    None => Vec::new(),
                };
                let path = workspace.resolve(name);
                let id = tree.add_file_node(&path, children)?;
                ids.push(id);
            }
            Ok(ids)
        }
        TreeSpec::List(items) => {
            let mut ids = Vec::new();
            for item in items {
                ids.extend(graft(tree, item, workspace, options)?);
            }
            Ok(ids)
        }
        TreeSpec::Pattern(pattern) => pattern_leaves(tree, pattern, workspace, options),
    }
}

/// Expand a pattern leaf into child nodes: one leaf per matched existing
/// path by default, or a single aggregate node when requested.
fn pattern_leaves(
    tree: &mut DepTree,
    pattern: &str,
    workspace: &Workspace,
    options: MaterializeOptions,
) -> Result<Vec<NodeId>> {
    if options.aggregate_leaves {
        let spec = AggregateSpec::new(
            workspace,
            None,
            [SpecEntry::Pattern(pattern.to_string())],
        )?;
        let id = tree.add_node(Some(pattern.to_string()), spec.newest(), Vec::new())?;
        return Ok(vec![id]);
    }

    let mut ids = Vec::new();
    for path in expand_pattern(pattern, workspace.root())? {
        ids.push(tree.add_file_node(&path, Vec::new())?);
    }
    Ok(ids)
}
