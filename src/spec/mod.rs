// src/spec/mod.rs

//! Aggregate freshness specs.
//!
//! An [`AggregateSpec`] wraps a base directory plus an ordered list of
//! literal paths and patterns, and reduces the matched files to a single
//! oldest/newest freshness range. It is the mechanism by which one logical
//! dependency stands for many files.

pub mod aggregate;

pub use aggregate::{AggregateSpec, SpecEntry};
