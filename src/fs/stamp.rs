// src/fs/stamp.rs

use std::fmt;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};

/// Snapshot freshness value for a file artifact.
///
/// Ordering is total: `Missing < At(_) < Infinite`. The sentinel variants
/// double as reduction identities: an empty aggregate reduces to `Infinite`
/// on its oldest side (min identity) and `Missing` on its newest side (max
/// identity), so a spec that matched nothing can never make a dependent
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stamp {
    /// Artifact does not exist on disk yet. Minimal, so any existing
    /// dependency makes its dependent stale.
    Missing,
    /// Modification time captured when the owning node or spec was built.
    At(std::time::SystemTime),
    /// Virtual-root sentinel. Never stale relative to its own absence.
    Infinite,
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::Missing => write!(f, "missing"),
            Stamp::Infinite => write!(f, "virtual"),
            Stamp::At(t) => match t.duration_since(UNIX_EPOCH) {
                Ok(d) => write!(f, "{}.{:09}", d.as_secs(), d.subsec_nanos()),
                Err(_) => write!(f, "pre-epoch"),
            },
        }
    }
}

/// Stat a path and capture its freshness.
///
/// `NotFound` maps to [`Stamp::Missing`]; every other failure (permissions,
/// I/O) propagates to the caller uninterpreted.
pub fn stamp_of(path: &Path) -> Result<Stamp> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            let modified = meta
                .modified()
                .with_context(|| format!("reading mtime of {:?}", path))?;
            Ok(Stamp::At(modified))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Stamp::Missing),
        Err(err) => Err(err).with_context(|| format!("stat failed for {:?}", path)),
    }
}

/// Anything that can stand on the "newer" side of a staleness comparison.
///
/// Comparisons are polymorphic over specs, tree nodes and bare files. The
/// trait bound surfaces an unsupported operand at compile time instead of
/// at runtime.
pub trait Freshness {
    /// Newest relevant timestamp of this entity.
    fn newest_stamp(&self) -> Result<Stamp>;
}

impl Freshness for Stamp {
    fn newest_stamp(&self) -> Result<Stamp> {
        Ok(*self)
    }
}

impl Freshness for Path {
    /// Bare files are statted at comparison time rather than snapshotted.
    fn newest_stamp(&self) -> Result<Stamp> {
        stamp_of(self)
    }
}
