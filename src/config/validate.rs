// src/config/validate.rs

use anyhow::{anyhow, Result};

use crate::config::model::ManifestFile;
use crate::tree::TreeSpec;

/// Run basic semantic validation against a loaded manifest.
///
/// This checks:
/// - the manifest describes some work: a `[tree]` or at least one `[[compare]]`
/// - a `[tree]` description has at least one top-level entry
/// - every `[spec.<name>]` has a non-empty entry list
/// - `[[compare]]` references resolve to declared specs and are not
///   self-comparisons
///
/// It does **not** touch the filesystem: patterns are compiled and paths
/// statted only during evaluation.
pub fn validate_manifest(manifest: &ManifestFile) -> Result<()> {
    ensure_has_work(manifest)?;
    validate_tree_shape(manifest)?;
    validate_specs(manifest)?;
    validate_compares(manifest)?;
    Ok(())
}

fn ensure_has_work(manifest: &ManifestFile) -> Result<()> {
    if manifest.tree.is_none() && manifest.compare.is_empty() {
        return Err(anyhow!(
            "manifest must define a [tree] or at least one [[compare]]"
        ));
    }
    Ok(())
}

fn validate_tree_shape(manifest: &ManifestFile) -> Result<()> {
    match &manifest.tree {
        Some(TreeSpec::Map(map)) if map.is_empty() => Err(anyhow!(
            "[tree] must have at least one top-level entry"
        )),
        Some(TreeSpec::List(items)) if items.is_empty() => Err(anyhow!(
            "[tree] must have at least one top-level entry"
        )),
        _ => Ok(()),
    }
}

fn validate_specs(manifest: &ManifestFile) -> Result<()> {
    for (name, section) in manifest.spec.iter() {
        if section.entries.is_empty() {
            return Err(anyhow!(
                "spec '{}' must list at least one literal path or pattern",
                name
            ));
        }
    }
    Ok(())
}

fn validate_compares(manifest: &ManifestFile) -> Result<()> {
    for cmp in manifest.compare.iter() {
        for side in [&cmp.target, &cmp.against] {
            if !manifest.spec.contains_key(side) {
                return Err(anyhow!(
                    "[[compare]] references unknown spec '{}'",
                    side
                ));
            }
        }
        if cmp.target == cmp.against {
            return Err(anyhow!(
                "[[compare]] cannot compare spec '{}' against itself",
                cmp.target
            ));
        }
    }
    Ok(())
}
