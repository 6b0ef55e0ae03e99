//! The `verify` and `list` subcommands
//!
//! `verify` exposes the drift engine directly: it recomputes the
//! fingerprint of a current structural export and compares it against the
//! stored one. Drift is a detection result with its own exit code, not a
//! pipeline error.

use anyhow::Context;
use frost_core::{Fingerprint, SchemaVersion, StructuralManifest};
use frost_store::{DriftResult, FixtureStore};
use std::path::{Path, PathBuf};

fn open_store(output: Option<PathBuf>) -> anyhow::Result<FixtureStore> {
    let root = match output {
        Some(dir) => dir,
        None => std::env::current_dir()
            .context("cannot determine working directory")?
            .join("Fixtures"),
    };
    Ok(FixtureStore::new(root))
}

/// Run `frost list`; returns the process exit code
pub(crate) fn list(output: Option<PathBuf>) -> anyhow::Result<i32> {
    let store = open_store(output)?;
    let versions = store.list_versions().context("cannot list fixture store")?;
    if versions.is_empty() {
        println!("no frozen versions in {}", store.root().display());
        return Ok(0);
    }
    for version in versions {
        println!("{version}");
    }
    Ok(0)
}

/// Run `frost verify`; returns the process exit code
pub(crate) fn run(
    version: &str,
    manifest_path: &Path,
    output: Option<PathBuf>,
) -> anyhow::Result<i32> {
    let version = match SchemaVersion::parse(version) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(2);
        }
    };
    let store = open_store(output)?;
    let Some(stored) = store
        .load(&version)
        .with_context(|| format!("cannot load fixtures for {version}"))?
    else {
        eprintln!(
            "error: no fixtures for version {version} in {}",
            store.root().display()
        );
        return Ok(7);
    };

    let bytes = std::fs::read(manifest_path)
        .with_context(|| format!("cannot read {}", manifest_path.display()))?;
    let current = StructuralManifest::from_json(&bytes)
        .with_context(|| format!("{} is not a structural manifest", manifest_path.display()))?;
    let current_fingerprint = Fingerprint::of_manifest(&current);

    match DriftResult::compare(&stored.fingerprint, &current_fingerprint) {
        DriftResult::Match => {
            println!("schema {version} matches its frozen definition");
            Ok(0)
        }
        DriftResult::Drift { expected, actual } => {
            println!("schema {version} has drifted from its frozen definition");
            println!("  expected: {expected}");
            println!("  actual:   {actual}");
            Ok(1)
        }
    }
}
