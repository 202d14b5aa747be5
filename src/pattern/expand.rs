// src/pattern/expand.rs

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::Glob;
use tracing::debug;

/// Expand a multi-segment wildcard pattern against a base directory.
///
/// Each `/`-separated segment is matched independently against the
/// directory listing of every path the previous segment produced, and the
/// results are flattened into one breadth set. `"a*/b*"` against a
/// directory containing `a1/b1` and `a2/b2` therefore yields exactly those
/// two paths.
///
/// A matched intermediate that is not a directory (or no longer exists)
/// contributes nothing. Output order follows directory listing order and
/// is only as deterministic as that; callers reduce to oldest/newest and
/// must not rely on more.
pub fn expand_pattern(pattern: &str, base: &Path) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    if path.has_root() {
        bail!("pattern {pattern:?} must be relative to its base directory");
    }
    let segments = split_segments(path)?;
    expand_against(&segments, vec![base.to_path_buf()])
}

/// Expand a pattern with no base directory.
///
/// The first segment anchors the expansion: it is taken literally, never
/// matched. For an absolute pattern the filesystem root is the anchor and
/// every following segment, including the first named one, is expanded.
pub fn expand_anchored(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut anchor = PathBuf::new();
    let mut segments = Vec::new();

    for comp in Path::new(pattern).components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => anchor.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::Normal(seg) => {
                if anchor.as_os_str().is_empty() && segments.is_empty() {
                    anchor.push(seg);
                } else {
                    segments.push(segment_str(seg, pattern)?);
                }
            }
            Component::ParentDir => {
                bail!("pattern {pattern:?} may not traverse upwards with `..`")
            }
        }
    }

    if anchor.as_os_str().is_empty() {
        bail!("empty pattern");
    }

    expand_against(&segments, vec![anchor])
}

fn split_segments(pattern: &Path) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    for comp in pattern.components() {
        match comp {
            Component::Normal(seg) => segments.push(segment_str(seg, pattern)?),
            Component::CurDir => {}
            other => bail!("unsupported component {other:?} in pattern {pattern:?}"),
        }
    }
    Ok(segments)
}

fn segment_str(seg: &std::ffi::OsStr, pattern: impl std::fmt::Debug) -> Result<String> {
    seg.to_str()
        .map(|s| s.to_string())
        .with_context(|| format!("non-UTF-8 segment in pattern {pattern:?}"))
}

/// One round of expansion per segment: list every current base, keep the
/// entries whose name matches, feed the survivors to the next segment.
fn expand_against(segments: &[String], bases: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut current = bases;

    for segment in segments {
        let matcher = Glob::new(segment)
            .with_context(|| format!("invalid pattern segment: {segment}"))?
            .compile_matcher();

        let mut next = Vec::new();
        for base in &current {
            if !base.is_dir() {
                // A previous segment may have matched a plain file; it
                // simply cannot be expanded further.
                continue;
            }
            let entries = std::fs::read_dir(base)
                .with_context(|| format!("listing directory {:?}", base))?;
            for entry in entries {
                let entry =
                    entry.with_context(|| format!("listing directory {:?}", base))?;
                let name = entry.file_name();
                if matcher.is_match(Path::new(&name)) {
                    next.push(entry.path());
                }
            }
        }

        debug!(segment = %segment, matched = next.len(), "expanded pattern segment");
        current = next;
        if current.is_empty() {
            break;
        }
    }

    Ok(current)
}
