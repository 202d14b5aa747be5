// src/config/mod.rs

//! Manifest loading and validation for staletree.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest file from disk (`loader.rs`).
//! - Validate basic invariants like spec references (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_manifest_path, load_and_validate, load_from_path};
pub use model::{CompareSection, ManifestFile, SpecSection, WorkspaceSection};
pub use validate::validate_manifest;
