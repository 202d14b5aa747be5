// src/tree/mod.rs

//! Dependency tree and dirty propagation.
//!
//! - [`node`] holds the arena, node handles and construction.
//! - [`dirty`] implements the single-pass `is_dirty` query and the
//!   authoritative bottom-up `collect_dirty` pass.
//! - [`materialize`] turns a declarative description into a tree.

pub mod dirty;
pub mod materialize;
pub mod node;

pub use materialize::{materialize, MaterializeOptions, TreeSpec};
pub use node::{DepNode, DepTree, NodeId};
