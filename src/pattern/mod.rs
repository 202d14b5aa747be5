// src/pattern/mod.rs

//! Multi-segment wildcard expansion.
//!
//! Splits a pattern like `"src/a*/b*"` into per-directory segments and
//! matches each against the listing of the previous round's results, so a
//! single segment can fan out into many directories. This is the only
//! place in the crate that walks directories.

pub mod expand;

pub use expand::{expand_anchored, expand_pattern};
