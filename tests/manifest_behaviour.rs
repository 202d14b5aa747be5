use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use staletree::config::{load_and_validate, validate_manifest, ManifestFile};
use staletree::fs::Workspace;
use staletree::plan::PlanEntry;
use staletree::tree::{MaterializeOptions, TreeSpec};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn base_time() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

fn touch_at(dir: &Path, name: &str, offset_secs: u64) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let file = File::create(&path)?;
    file.set_modified(base_time() + Duration::from_secs(offset_secs))?;
    Ok(path)
}

const FULL_MANIFEST: &str = r#"
[tree.root]
b1 = "c*"
b2 = {}

[spec.inputs]
entries = ["c*"]

[spec.outputs]
entries = ["root"]

[[compare]]
target = "outputs"
against = "inputs"
"#;

#[test]
fn parses_a_full_manifest_from_toml() -> TestResult {
    let manifest: ManifestFile = toml::from_str(FULL_MANIFEST)?;
    validate_manifest(&manifest)?;

    let Some(TreeSpec::Map(top)) = &manifest.tree else {
        panic!("expected a top-level map");
    };
    assert!(top.contains_key("root"));
    assert_eq!(manifest.spec.len(), 2);
    assert_eq!(manifest.compare.len(), 1);
    Ok(())
}

#[test]
fn empty_table_means_no_dependencies() -> TestResult {
    let manifest: ManifestFile = toml::from_str(FULL_MANIFEST)?;
    let Some(TreeSpec::Map(top)) = &manifest.tree else {
        panic!("expected a top-level map");
    };
    let Some(Some(TreeSpec::Map(root))) = top.get("root") else {
        panic!("expected root to map its dependencies");
    };
    assert!(matches!(
        root.get("b2"),
        Some(Some(TreeSpec::Map(map))) if map.is_empty()
    ));
    Ok(())
}

#[test]
fn manifest_without_work_is_rejected() -> TestResult {
    let manifest: ManifestFile = toml::from_str("[workspace]\n")?;
    assert!(validate_manifest(&manifest).is_err());
    Ok(())
}

#[test]
fn empty_tree_section_is_rejected() -> TestResult {
    let manifest: ManifestFile = toml::from_str("[tree]\n")?;
    assert!(validate_manifest(&manifest).is_err());
    Ok(())
}

#[test]
fn compare_referencing_unknown_spec_is_rejected() -> TestResult {
    let manifest: ManifestFile = toml::from_str(
        r#"
[spec.inputs]
entries = ["a*"]

[[compare]]
target = "outputs"
against = "inputs"
"#,
    )?;
    assert!(validate_manifest(&manifest).is_err());
    Ok(())
}

#[test]
fn self_compare_is_rejected() -> TestResult {
    let manifest: ManifestFile = toml::from_str(
        r#"
[spec.inputs]
entries = ["a*"]

[[compare]]
target = "inputs"
against = "inputs"
"#,
    )?;
    assert!(validate_manifest(&manifest).is_err());
    Ok(())
}

#[test]
fn spec_with_no_entries_is_rejected() -> TestResult {
    let manifest: ManifestFile = toml::from_str(
        r#"
[spec.inputs]
entries = []

[[compare]]
target = "inputs"
against = "inputs"
"#,
    )?;
    assert!(validate_manifest(&manifest).is_err());
    Ok(())
}

#[test]
fn plan_orders_tree_dirt_and_reports_stale_compares() -> TestResult {
    let dir = tempdir()?;
    for name in ["c1", "c2", "b1", "b2", "root"] {
        touch_at(dir.path(), name, 0)?;
    }
    touch_at(dir.path(), "c1", 5)?;

    let manifest: ManifestFile = toml::from_str(FULL_MANIFEST)?;
    validate_manifest(&manifest)?;

    let ws = Workspace::new(dir.path());
    let plan = staletree::build_plan(&manifest, &ws, MaterializeOptions::default())?;

    assert!(plan.anything_stale());
    let entries = plan.entries();
    assert_eq!(entries.len(), 3);
    assert!(matches!(&entries[0], PlanEntry::Node { name, .. } if name == "b1"));
    assert!(matches!(&entries[1], PlanEntry::Node { name, .. } if name == "root"));
    assert!(matches!(
        &entries[2],
        PlanEntry::Spec { target, against, match_count, .. }
            if target == "outputs" && against == "inputs" && *match_count == 1
    ));

    let rendered = plan.render();
    assert!(rendered.contains("rebuild b1"));
    assert!(rendered.contains("stale against inputs"));
    Ok(())
}

#[test]
fn clean_workspace_yields_an_empty_plan() -> TestResult {
    let dir = tempdir()?;
    for name in ["c1", "c2", "b1", "b2", "root"] {
        touch_at(dir.path(), name, 0)?;
    }

    let manifest: ManifestFile = toml::from_str(FULL_MANIFEST)?;
    let ws = Workspace::new(dir.path());
    let plan = staletree::build_plan(&manifest, &ws, MaterializeOptions::default())?;

    assert!(!plan.anything_stale());
    assert!(plan.entries().is_empty());
    Ok(())
}

#[test]
fn manifest_loads_and_validates_from_disk() -> TestResult {
    let dir = tempdir()?;
    for name in ["c1", "c2", "b1", "b2", "root"] {
        touch_at(dir.path(), name, 0)?;
    }
    let manifest_path = dir.path().join("Staletree.toml");
    fs::write(&manifest_path, FULL_MANIFEST)?;

    let manifest = load_and_validate(&manifest_path)?;
    assert!(manifest.tree.is_some());
    Ok(())
}
