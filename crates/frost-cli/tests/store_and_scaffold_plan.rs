//! Functional tests for fixture store semantics and scaffold ownership.
//!
//! These tests anchor the cross-crate invariants:
//! - scaffolds are created once and owned by the user afterwards,
//! - preceding-version lookup is numeric and junk-tolerant,
//! - stored fingerprints are reproducible and detect structural drift.

use frost_core::{Fingerprint, SchemaVersion, StructuralManifest};
use frost_orchestrator::{ConventionOverrides, ExtractionChannel, FreezePipeline, FreezeRequest};
use frost_scaffold::find_preceding_version;
use frost_store::{DriftResult, FixtureStore};
use frost_test_utils::{FakeSandboxRuntime, TempProject};
use std::fs;

fn freeze(project: &TempProject, version: &str, entities: &[&str], force: bool) {
    let parsed = SchemaVersion::parse(version).unwrap();
    let exports = tempfile::tempdir().unwrap();
    let pipeline = FreezePipeline::new(
        FakeSandboxRuntime::dropping(&parsed, entities),
        ExtractionChannel::new(exports.path()),
    );
    pipeline
        .run(&FreezeRequest {
            version: parsed,
            force,
            working_dir: project.root().to_path_buf(),
            fixtures_root: project.fixtures_root(),
            source_roots: Vec::new(),
            overrides: ConventionOverrides::default(),
        })
        .unwrap();
}

/// Tenet: a scaffold is written exactly once; a forced re-freeze reports the
/// existing file as skipped and leaves user edits byte-identical.
#[test]
fn scaffolds_are_user_owned_after_creation() {
    let project = TempProject::new("my-app");
    project.add_schema("1.0.0", "AppSchemaV1");

    freeze(&project, "1.0.0", &["User"], false);
    let scaffold = project.tests_dir().join("app_schema_v1_drift_tests.rs");
    assert!(scaffold.is_file());

    let user_version = "// customized by the application team\n";
    fs::write(&scaffold, user_version).unwrap();

    freeze(&project, "1.0.0", &["User"], true);
    assert_eq!(
        fs::read_to_string(&scaffold).unwrap(),
        user_version,
        "re-freeze must never rewrite an existing scaffold"
    );
}

/// Tenet: preceding-version lookup over a real store listing compares
/// segments numerically, so 1.11.0 precedes 2.0.0 even though "1.9.0" would
/// win a lexicographic comparison.
#[test]
fn preceding_version_over_store_listing_is_numeric() {
    let project = TempProject::new("my-app");
    for (version, ty) in [
        ("1.0.0", "SchemaA"),
        ("1.9.0", "SchemaB"),
        ("1.10.0", "SchemaC"),
        ("1.11.0", "SchemaD"),
        ("2.0.0", "SchemaE"),
    ] {
        project.add_schema(version, ty);
        freeze(&project, version, &["User"], false);
    }

    let store = FixtureStore::new(project.fixtures_root());
    let frozen = store.list_versions().unwrap();
    let current = SchemaVersion::parse("2.0.0").unwrap();
    assert_eq!(
        find_preceding_version(&current, &frozen).unwrap().as_str(),
        "1.11.0"
    );
}

/// Tenet: junk and malformed entries in the fixture directory are invisible
/// to version listings and preceding-version lookup.
#[test]
fn junk_store_entries_are_ignored() {
    let project = TempProject::new("my-app");
    project.add_schema("1.0.0", "SchemaA");
    project.add_schema("2.0.0", "SchemaB");
    freeze(&project, "1.0.0", &["User"], false);
    freeze(&project, "2.0.0", &["User"], false);

    let root = project.fixtures_root();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("v1.5.0")).unwrap();
    fs::write(root.join("README.md"), b"fixture docs").unwrap();

    let store = FixtureStore::new(&root);
    let frozen = store.list_versions().unwrap();
    let names: Vec<&str> = frozen.iter().map(SchemaVersion::as_str).collect();
    assert_eq!(names, vec!["1.0.0", "2.0.0"]);

    let current = SchemaVersion::parse("2.0.0").unwrap();
    assert_eq!(
        find_preceding_version(&current, &frozen).unwrap().as_str(),
        "1.0.0"
    );
}

/// Tenet: the stored fingerprint is reproducible from the stored manifest,
/// and a structurally changed manifest is reported as drift with both
/// fingerprints shown.
#[test]
fn stored_fingerprint_is_reproducible_and_detects_drift() {
    let project = TempProject::new("my-app");
    project.add_schema("1.0.0", "AppSchemaV1");
    freeze(&project, "1.0.0", &["User", "Post"], false);

    let store = FixtureStore::new(project.fixtures_root());
    let version = SchemaVersion::parse("1.0.0").unwrap();
    let loaded = store.load(&version).unwrap().unwrap();

    // Recomputing from the stored manifest reproduces the stored value.
    let recomputed = Fingerprint::of_manifest(&loaded.manifest);
    assert_eq!(recomputed, loaded.fingerprint);
    assert!(DriftResult::compare(&loaded.fingerprint, &recomputed).is_match());

    // A schema change shows up as drift carrying both fingerprints.
    let drifted = StructuralManifest::new(vec![
        "User".to_string(),
        "Post".to_string(),
        "AuditLog".to_string(),
    ]);
    let current = Fingerprint::of_manifest(&drifted);
    match DriftResult::compare(&loaded.fingerprint, &current) {
        DriftResult::Drift { expected, actual } => {
            assert_eq!(expected, loaded.fingerprint);
            assert_eq!(actual, current);
        }
        DriftResult::Match => panic!("expected drift"),
    }
}

/// Tenet: every committed artifact filename embeds the version, so fixture
/// sets for different versions never collide in one build unit.
#[test]
fn artifact_filenames_are_unique_across_versions() {
    let project = TempProject::new("my-app");
    project.add_schema("1.0.0", "SchemaA");
    project.add_schema("1.1.0", "SchemaB");
    freeze(&project, "1.0.0", &["User"], false);
    freeze(&project, "1.1.0", &["User"], false);

    let root = project.fixtures_root();
    let mut names = Vec::new();
    for dir in ["1.0.0", "1.1.0"] {
        for entry in fs::read_dir(root.join(dir)).unwrap().flatten() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    let unique: std::collections::BTreeSet<_> = names.iter().cloned().collect();
    assert_eq!(unique.len(), names.len(), "colliding basenames: {names:?}");
}
