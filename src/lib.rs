// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod pattern;
pub mod plan;
pub mod spec;
pub mod tree;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ManifestFile;
use crate::fs::Workspace;
use crate::plan::RebuildPlan;
use crate::spec::{AggregateSpec, SpecEntry};
use crate::tree::{materialize, MaterializeOptions, TreeSpec};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading
/// - workspace resolution
/// - tree materialization + dirty collection
/// - named-spec evaluation + comparisons
///
/// Returns the process exit code so `--check` can signal staleness.
pub fn run(args: CliArgs) -> Result<i32> {
    let manifest_path = PathBuf::from(&args.config);
    let manifest = load_and_validate(&manifest_path)?;

    if args.dry_run {
        print_dry_run(&manifest);
        return Ok(0);
    }

    let workspace = workspace_from(&manifest, &manifest_path);
    info!(root = ?workspace.root(), "workspace resolved");

    let options = MaterializeOptions {
        aggregate_leaves: args.aggregate_leaves,
    };
    let plan = build_plan(&manifest, &workspace, options)?;

    if args.check {
        return if plan.anything_stale() {
            println!("stale");
            Ok(1)
        } else {
            println!("clean");
            Ok(0)
        };
    }

    if plan.is_empty() {
        println!("nothing to rebuild");
    } else {
        print!("{}", plan.render());
    }
    Ok(0)
}

/// Evaluate everything the manifest asks for into one ordered plan.
///
/// Tree dirt comes first (children before dependents), then stale spec
/// comparisons in manifest order.
pub fn build_plan(
    manifest: &ManifestFile,
    workspace: &Workspace,
    options: MaterializeOptions,
) -> Result<RebuildPlan> {
    let mut plan = RebuildPlan::new();

    if let Some(tree_spec) = &manifest.tree {
        let (mut tree, root) = materialize(tree_spec, workspace, options)?;
        plan.push_dirty_nodes(&mut tree, root);
    }

    if !manifest.compare.is_empty() {
        let specs = evaluate_named_specs(manifest, workspace)?;
        for cmp in &manifest.compare {
            let target = lookup_spec(&specs, &cmp.target)?;
            let against = lookup_spec(&specs, &cmp.against)?;
            if target.is_stale_relative_to(against)? {
                info!(target = %cmp.target, against = %cmp.against, "spec is stale");
                plan.push_stale_spec(&cmp.target, &cmp.against, target);
            } else {
                debug!(target = %cmp.target, against = %cmp.against, "spec is fresh");
            }
        }
    }

    Ok(plan)
}

/// Build and snapshot every `[spec.<name>]` section once.
fn evaluate_named_specs(
    manifest: &ManifestFile,
    workspace: &Workspace,
) -> Result<BTreeMap<String, AggregateSpec>> {
    let mut specs = BTreeMap::new();
    for (name, section) in manifest.spec.iter() {
        let entries = section.entries.iter().map(|raw| SpecEntry::parse(raw));
        let dir = section.dir.as_deref().map(Path::new);
        let spec = AggregateSpec::new(workspace, dir, entries)
            .with_context(|| format!("evaluating spec '{name}'"))?;
        debug!(spec = %name, matches = spec.match_count(), "named spec evaluated");
        specs.insert(name.clone(), spec);
    }
    Ok(specs)
}

fn lookup_spec<'a>(
    specs: &'a BTreeMap<String, AggregateSpec>,
    name: &str,
) -> Result<&'a AggregateSpec> {
    specs
        .get(name)
        .ok_or_else(|| anyhow!("[[compare]] references unknown spec '{name}'"))
}

/// Resolve the workspace root: the manifest's own directory unless
/// `[workspace] root` overrides it.
fn workspace_from(manifest: &ManifestFile, manifest_path: &Path) -> Workspace {
    let base = manifest_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    match &manifest.workspace.root {
        Some(root) => {
            let root_path = Path::new(root);
            if root_path.is_absolute() {
                Workspace::new(root_path)
            } else {
                Workspace::new(base.join(root_path))
            }
        }
        None => Workspace::new(base),
    }
}

/// Simple dry-run output: print the workspace, tree and spec sections.
fn print_dry_run(manifest: &ManifestFile) {
    println!("staletree dry-run");
    match &manifest.workspace.root {
        Some(root) => println!("  workspace.root = {root}"),
        None => println!("  workspace.root = <manifest directory>"),
    }
    println!();

    match &manifest.tree {
        Some(tree) => {
            println!("tree:");
            print_tree_spec(tree, 1);
        }
        None => println!("tree: <none>"),
    }

    println!();
    println!("specs ({}):", manifest.spec.len());
    for (name, section) in manifest.spec.iter() {
        println!("  - {name}");
        if let Some(ref dir) = section.dir {
            println!("      dir: {dir}");
        }
        println!("      entries: {:?}", section.entries);
    }

    println!();
    println!("compares ({}):", manifest.compare.len());
    for cmp in manifest.compare.iter() {
        println!("  - {} vs {}", cmp.target, cmp.against);
    }

    debug!("dry-run complete (no staleness evaluation)");
}

fn print_tree_spec(spec: &TreeSpec, depth: usize) {
    let indent = "  ".repeat(depth);
    match spec {
        TreeSpec::Pattern(pattern) => println!("{indent}pattern {pattern}"),
        TreeSpec::List(items) => {
            for item in items {
                print_tree_spec(item, depth);
            }
        }
        TreeSpec::Map(map) => {
            for (name, deps) in map {
                println!("{indent}{name}");
                if let Some(deps) = deps {
                    print_tree_spec(deps, depth + 1);
                }
            }
        }
    }
}
