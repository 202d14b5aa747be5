// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::tree::TreeSpec;

/// Top-level manifest as read from a TOML file.
///
/// ```toml
/// [workspace]
/// root = "build"
///
/// [tree.final]
/// intermediate = "src/a*"
///
/// [spec.inputs]
/// entries = ["a*"]
///
/// [spec.outputs]
/// dir = "db"
/// entries = ["final"]
///
/// [[compare]]
/// target = "outputs"
/// against = "inputs"
/// ```
///
/// All sections are optional at parse time; validation decides what is
/// actually required.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ManifestFile {
    /// Base-directory settings from `[workspace]`.
    #[serde(default)]
    pub workspace: WorkspaceSection,

    /// Declarative dependency description from `[tree]`.
    #[serde(default)]
    pub tree: Option<TreeSpec>,

    /// Named aggregate specs from `[spec.<name>]`.
    #[serde(default)]
    pub spec: BTreeMap<String, SpecSection>,

    /// Staleness comparisons from `[[compare]]`.
    #[serde(default)]
    pub compare: Vec<CompareSection>,
}

/// `[workspace]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkspaceSection {
    /// Directory all relative paths resolve against.
    ///
    /// A relative value is itself resolved against the manifest's own
    /// directory; when omitted, the manifest's directory is the root.
    #[serde(default)]
    pub root: Option<String>,
}

/// `[spec.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecSection {
    /// Directory the entries resolve against, relative to the workspace
    /// root. Defaults to the root itself.
    #[serde(default)]
    pub dir: Option<String>,

    /// Ordered literal paths and/or patterns. Strings with glob
    /// metacharacters are treated as patterns.
    pub entries: Vec<String>,
}

/// One `[[compare]]` element: is `target` stale relative to `against`?
#[derive(Debug, Clone, Deserialize)]
pub struct CompareSection {
    pub target: String,
    pub against: String,
}
