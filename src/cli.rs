// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `staletree`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "staletree",
    version,
    about = "Report stale artifacts and an ordered rebuild plan from a dependency manifest.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the manifest (TOML).
    ///
    /// Default: `Staletree.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Staletree.toml")]
    pub config: String,

    /// Only answer "is anything stale": exit 1 when stale, 0 when clean.
    #[arg(long)]
    pub check: bool,

    /// Materialize each pattern leaf as one aggregate node instead of one
    /// node per matched file.
    #[arg(long)]
    pub aggregate_leaves: bool,

    /// Parse + validate, print the manifest, but don't evaluate staleness.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STALETREE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
