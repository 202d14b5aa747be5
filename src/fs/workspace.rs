// src/fs/workspace.rs

use std::path::{Path, PathBuf};

/// Explicit base-directory context for resolving relative paths.
///
/// Threaded into every construction and evaluation call; there is no
/// process-wide default directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory all relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths pass through untouched; relative paths are joined
    /// onto the workspace root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
