// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ManifestFile;
use crate::config::validate::validate_manifest;

/// Load a manifest from a given path and return the raw `ManifestFile`.
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation (spec references, tree shape, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ManifestFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading manifest at {:?}", path))?;

    let manifest: ManifestFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML manifest from {:?}", path))?;

    Ok(manifest)
}

/// Load a manifest from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that the manifest describes any work at all, that `[[compare]]`
///   references resolve to declared specs, and that spec entry lists are
///   non-empty.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ManifestFile> {
    let manifest = load_from_path(&path)?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Helper to resolve a default manifest path.
///
/// Currently this just returns `Staletree.toml` in the current working
/// directory.
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from("Staletree.toml")
}
