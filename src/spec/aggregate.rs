// src/spec/aggregate.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::fs::{stamp_of, Freshness, Stamp, Workspace};
use crate::pattern::expand_pattern;

/// One element of an aggregate spec: either a literal relative path or a
/// wildcard pattern resolved against the spec's base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecEntry {
    Literal(PathBuf),
    Pattern(String),
}

impl SpecEntry {
    /// Classify a raw string: anything holding glob metacharacters is a
    /// pattern, everything else a literal path.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(['*', '?', '[', '{']) {
            SpecEntry::Pattern(raw.to_string())
        } else {
            SpecEntry::Literal(PathBuf::from(raw))
        }
    }
}

impl From<&str> for SpecEntry {
    fn from(raw: &str) -> Self {
        SpecEntry::parse(raw)
    }
}

impl From<PathBuf> for SpecEntry {
    fn from(path: PathBuf) -> Self {
        SpecEntry::Literal(path)
    }
}

/// A directory-rooted set of literal paths and patterns evaluated as one
/// freshness range.
///
/// Derived state (`match_count`, `oldest`, `newest`) is a snapshot taken
/// at construction and replaced wholesale by [`AggregateSpec::evaluate`],
/// never merged incrementally. Filesystem changes after a snapshot stay
/// invisible until the next explicit `evaluate` call.
#[derive(Debug, Clone)]
pub struct AggregateSpec {
    base_dir: PathBuf,
    entries: Vec<SpecEntry>,
    match_count: usize,
    oldest: Stamp,
    newest: Stamp,
}

impl AggregateSpec {
    /// Build a spec rooted at `dir` (relative entries resolve against it;
    /// `None` means the workspace root) and take its first snapshot.
    pub fn new<I, E>(workspace: &Workspace, dir: Option<&Path>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<SpecEntry>,
    {
        let base_dir = match dir {
            Some(d) => workspace.resolve(d),
            None => workspace.root().to_path_buf(),
        };
        let mut spec = Self {
            base_dir,
            entries: entries.into_iter().map(Into::into).collect(),
            match_count: 0,
            oldest: Stamp::Infinite,
            newest: Stamp::Missing,
        };
        spec.evaluate()?;
        Ok(spec)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    /// Number of existing files matched by the last evaluation.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Oldest matched timestamp; `Infinite` when nothing matched.
    pub fn oldest(&self) -> Stamp {
        self.oldest
    }

    /// Newest matched timestamp; `Missing` when nothing matched, so an
    /// empty spec never makes a dependent stale.
    pub fn newest(&self) -> Stamp {
        self.newest
    }

    /// Re-snapshot the matched set, replacing all derived state.
    ///
    /// Literal entries contribute one sample each when they exist;
    /// patterns contribute every existing match. An entry that matches
    /// nothing leaves the reduction untouched.
    pub fn evaluate(&mut self) -> Result<()> {
        let mut count = 0usize;
        let mut oldest = Stamp::Infinite;
        let mut newest = Stamp::Missing;

        for entry in &self.entries {
            match entry {
                SpecEntry::Literal(rel) => {
                    let path = self.base_dir.join(rel);
                    if let stamp @ Stamp::At(_) = stamp_of(&path)? {
                        count += 1;
                        oldest = oldest.min(stamp);
                        newest = newest.max(stamp);
                    }
                }
                SpecEntry::Pattern(pattern) => {
                    for path in expand_pattern(pattern, &self.base_dir)? {
                        if let stamp @ Stamp::At(_) = stamp_of(&path)? {
                            count += 1;
                            oldest = oldest.min(stamp);
                            newest = newest.max(stamp);
                        }
                    }
                }
            }
        }

        self.match_count = count;
        self.oldest = oldest;
        self.newest = newest;

        debug!(
            base = ?self.base_dir,
            matches = self.match_count,
            oldest = %self.oldest,
            newest = %self.newest,
            "aggregate spec evaluated"
        );
        Ok(())
    }

    /// Conservative staleness test: true iff any file in this spec is
    /// strictly older than the newest relevant file in `other`. Equal
    /// timestamps do not count as stale.
    pub fn is_stale_relative_to<F: Freshness + ?Sized>(&self, other: &F) -> Result<bool> {
        Ok(self.oldest < other.newest_stamp()?)
    }
}

impl Freshness for AggregateSpec {
    fn newest_stamp(&self) -> Result<Stamp> {
        Ok(self.newest)
    }
}
