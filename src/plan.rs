// src/plan.rs

//! Ordered rebuild-plan assembly.
//!
//! The plan is the externally consumed output: a rebuild executor applies
//! actions to the entries in exactly this order so that every dependency
//! is regenerated before its dependents, then re-snapshots (fresh tree or
//! explicit re-evaluation) before any subsequent staleness query.

use std::fmt::Write as _;

use crate::fs::Stamp;
use crate::spec::AggregateSpec;
use crate::tree::{DepTree, NodeId};

/// One stale item in the plan.
#[derive(Debug, Clone)]
pub enum PlanEntry {
    /// A dirty tree node with its snapshot stamp.
    Node { name: String, stamp: Stamp },
    /// A named aggregate spec judged stale against another spec.
    Spec {
        target: String,
        against: String,
        oldest: Stamp,
        newest: Stamp,
        match_count: usize,
    },
}

/// The ordered, deduplicated rebuild plan.
#[derive(Debug, Clone, Default)]
pub struct RebuildPlan {
    entries: Vec<PlanEntry>,
}

impl RebuildPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The boolean "is anything stale" query.
    pub fn anything_stale(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Append a tree's dirty nodes, children-first in collect order.
    pub fn push_dirty_nodes(&mut self, tree: &mut DepTree, root: NodeId) {
        for id in tree.collect_dirty(root) {
            let node = tree.node(id);
            self.entries.push(PlanEntry::Node {
                name: node.name().unwrap_or("<unnamed>").to_string(),
                stamp: node.stamp(),
            });
        }
    }

    /// Record a spec comparison that came out stale.
    pub fn push_stale_spec(&mut self, target: &str, against: &str, spec: &AggregateSpec) {
        self.entries.push(PlanEntry::Spec {
            target: target.to_string(),
            against: against.to_string(),
            oldest: spec.oldest(),
            newest: spec.newest(),
            match_count: spec.match_count(),
        });
    }

    /// Human-readable rendering, one line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                PlanEntry::Node { name, stamp } => {
                    let _ = writeln!(out, "rebuild {name} (stamp {stamp})");
                }
                PlanEntry::Spec {
                    target,
                    against,
                    oldest,
                    newest,
                    match_count,
                } => {
                    let _ = writeln!(
                        out,
                        "rebuild {target} (stale against {against}; {match_count} files, range {oldest}..{newest})"
                    );
                }
            }
        }
        out
    }
}
