use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use staletree::fs::{Stamp, Workspace};
use staletree::tree::{materialize, DepTree, MaterializeOptions, NodeId, TreeSpec};
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

/// The declarative shape `{"root": [{"b1": "c*"}, {"b2": null}]}`.
fn med_tree_spec() -> TreeSpec {
    let mut b1 = BTreeMap::new();
    b1.insert("b1".to_string(), Some(TreeSpec::Pattern("c*".to_string())));
    let mut b2 = BTreeMap::new();
    b2.insert("b2".to_string(), None);

    let mut top = BTreeMap::new();
    top.insert(
        "root".to_string(),
        Some(TreeSpec::List(vec![TreeSpec::Map(b1), TreeSpec::Map(b2)])),
    );
    TreeSpec::Map(top)
}

/// Working directory with `c1, c2, b1, b2, root`, all stamped equal.
fn session_dir() -> Result<tempfile::TempDir, Box<dyn Error>> {
    let dir = tempdir()?;
    for name in ["c1", "c2", "b1", "b2", "root"] {
        touch_at(dir.path(), name, 0)?;
    }
    Ok(dir)
}

fn names(tree: &DepTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.node(id).name().unwrap_or("<unnamed>").to_string())
        .collect()
}

#[test]
fn single_entry_map_becomes_the_root() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    let (tree, root) = materialize(&med_tree_spec(), &ws, MaterializeOptions::default())?;

    let root_node = tree.node(root);
    assert_eq!(root_node.name(), Some("root"));
    assert_eq!(root_node.children().len(), 2);

    let b1 = tree.node(root_node.children()[0]);
    let b2 = tree.node(root_node.children()[1]);
    assert_eq!(b1.name(), Some("b1"));
    assert_eq!(b1.children().len(), 2);
    assert_eq!(b2.name(), Some("b2"));
    assert!(b2.children().is_empty());
    Ok(())
}

#[test]
fn equal_stamps_materialize_clean() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    let (mut tree, root) = materialize(&med_tree_spec(), &ws, MaterializeOptions::default())?;
    assert!(!tree.is_dirty(root));
    assert!(tree.collect_dirty(root).is_empty());
    Ok(())
}

#[test]
fn touched_leaf_dirties_its_ancestors_only() -> TestResult {
    let dir = session_dir()?;
    touch_at(dir.path(), "c1", 5)?;

    let ws = Workspace::new(dir.path());
    let (mut tree, root) = materialize(&med_tree_spec(), &ws, MaterializeOptions::default())?;

    let dirty = tree.collect_dirty(root);
    assert_eq!(names(&tree, &dirty), ["b1", "root"]);
    Ok(())
}

#[test]
fn multi_entry_top_level_gets_a_virtual_root() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    let mut top = BTreeMap::new();
    top.insert("b1".to_string(), Some(TreeSpec::Pattern("c*".to_string())));
    top.insert("b2".to_string(), None);

    let (mut tree, root) =
        materialize(&TreeSpec::Map(top), &ws, MaterializeOptions::default())?;

    let root_node = tree.node(root);
    assert_eq!(root_node.name(), None);
    assert_eq!(root_node.stamp(), Stamp::Infinite);
    assert_eq!(root_node.children().len(), 2);
    assert!(!tree.is_dirty(root));
    Ok(())
}

#[test]
fn empty_description_is_rejected() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    assert!(materialize(&TreeSpec::Map(BTreeMap::new()), &ws, MaterializeOptions::default())
        .is_err());
    assert!(materialize(&TreeSpec::List(Vec::new()), &ws, MaterializeOptions::default())
        .is_err());
    Ok(())
}

#[test]
fn aggregate_leaf_option_folds_a_pattern_into_one_node() -> TestResult {
    let dir = session_dir()?;
    touch_at(dir.path(), "c1", 5)?;

    let ws = Workspace::new(dir.path());
    let options = MaterializeOptions {
        aggregate_leaves: true,
    };
    let (mut tree, root) = materialize(&med_tree_spec(), &ws, options)?;

    let root_node = tree.node(root);
    let b1 = tree.node(root_node.children()[0]);
    assert_eq!(b1.children().len(), 1);

    let leaf = tree.node(b1.children()[0]);
    assert_eq!(leaf.name(), Some("c*"));
    // The aggregate carries the newest stamp of the matched set, so the
    // propagation outcome matches the expanded form.
    assert_eq!(leaf.stamp(), Stamp::At(base_time() + Duration::from_secs(5)));

    let dirty = tree.collect_dirty(root);
    assert_eq!(names(&tree, &dirty), ["b1", "root"]);
    Ok(())
}

#[test]
fn aggregate_leaf_with_no_matches_stays_silent() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    let mut top = BTreeMap::new();
    top.insert("root".to_string(), Some(TreeSpec::Pattern("z*".to_string())));

    let options = MaterializeOptions {
        aggregate_leaves: true,
    };
    let (mut tree, root) = materialize(&TreeSpec::Map(top), &ws, options)?;

    let leaf = tree.node(tree.node(root).children()[0]);
    assert_eq!(leaf.stamp(), Stamp::Missing);
    assert!(!tree.is_dirty(root));
    Ok(())
}

#[test]
fn missing_root_artifact_is_stale() -> TestResult {
    let dir = session_dir()?;
    let ws = Workspace::new(dir.path());

    let mut top = BTreeMap::new();
    top.insert("out".to_string(), Some(TreeSpec::Pattern("c*".to_string())));

    let (mut tree, root) =
        materialize(&TreeSpec::Map(top), &ws, MaterializeOptions::default())?;

    assert_eq!(tree.node(root).stamp(), Stamp::Missing);
    let dirty = tree.collect_dirty(root);
    assert_eq!(names(&tree, &dirty), ["out"]);
    Ok(())
}

#[test]
fn rebuilding_and_rematerializing_reports_clean() -> TestResult {
    let dir = session_dir()?;
    touch_at(dir.path(), "c1", 5)?;

    let ws = Workspace::new(dir.path());
    let (mut tree, root) = materialize(&med_tree_spec(), &ws, MaterializeOptions::default())?;
    let dirty = tree.collect_dirty(root);
    assert_eq!(names(&tree, &dirty), ["b1", "root"]);

    // Simulate the rebuild executor regenerating each stale artifact in
    // plan order, then taking a fresh snapshot.
    touch_at(dir.path(), "b1", 10)?;
    touch_at(dir.path(), "root", 15)?;

    let (mut fresh, fresh_root) =
        materialize(&med_tree_spec(), &ws, MaterializeOptions::default())?;
    assert!(!fresh.is_dirty(fresh_root));
    assert!(fresh.collect_dirty(fresh_root).is_empty());
    Ok(())
}
