//! Project conventions resolution
//!
//! Derives the build descriptor, build package, execution target, and
//! default sandbox from the surrounding project without configuration
//! input. Every result is overridable by explicit user input but defaults
//! automatically.
//!
//! The execution target follows one deterministic rule: it is the resolved
//! build package itself, and generated drivers are integration tests in
//! that package's `tests/` directory.

use crate::error::ConventionError;
use std::path::{Path, PathBuf};

/// Default sandbox name when none is configured
pub const DEFAULT_SANDBOX_NAME: &str = "frost-default";

/// Explicit user overrides for resolution
#[derive(Debug, Clone, Default)]
pub struct ConventionOverrides {
    /// Explicit build descriptor path (`--manifest-path`)
    pub manifest_path: Option<PathBuf>,
    /// Explicit build package (`--package`)
    pub package: Option<String>,
    /// Explicit sandbox name (`--sandbox`)
    pub sandbox: Option<String>,
}

/// Resolved conventions for one freeze invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConventions {
    /// Path to the build descriptor (`Cargo.toml`)
    pub build_descriptor: PathBuf,
    /// Directory containing the build descriptor
    pub workspace_root: PathBuf,
    /// Name of the build package; also the execution target
    pub package_name: String,
    /// Directory of the build package
    pub package_dir: PathBuf,
    /// Directory generated drivers are written into (`<package>/tests`)
    pub driver_dir: PathBuf,
    /// Sandbox name to resolve and boot
    pub sandbox_name: String,
}

/// One enumerable build package (a "scheme" in descriptor terms)
#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    dir: PathBuf,
    is_root: bool,
}

/// Resolve conventions for a working directory
///
/// # Errors
/// [`ConventionError::NoBuildDescriptorFound`] when no `Cargo.toml` exists
/// at the expected location (fatal for freeze, informational for init);
/// [`ConventionError::PackageNotFound`] when an explicit `--package` names
/// no enumerated package.
pub fn resolve(
    working_dir: &Path,
    overrides: &ConventionOverrides,
) -> Result<ProjectConventions, ConventionError> {
    let build_descriptor = overrides
        .manifest_path
        .clone()
        .unwrap_or_else(|| working_dir.join("Cargo.toml"));
    if !build_descriptor.is_file() {
        return Err(ConventionError::NoBuildDescriptorFound {
            dir: working_dir.to_path_buf(),
        });
    }
    let workspace_root = build_descriptor
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let packages = enumerate_packages(&build_descriptor, &workspace_root)?;
    if packages.is_empty() {
        return Err(ConventionError::NoPackages {
            path: build_descriptor,
        });
    }

    let chosen = select_package(&packages, overrides, &workspace_root)?;
    let driver_dir = chosen.dir.join("tests");
    let sandbox_name = overrides
        .sandbox
        .clone()
        .unwrap_or_else(|| DEFAULT_SANDBOX_NAME.to_string());

    tracing::debug!(
        package = %chosen.name,
        sandbox = %sandbox_name,
        descriptor = %build_descriptor.display(),
        "conventions resolved"
    );

    Ok(ProjectConventions {
        build_descriptor,
        workspace_root,
        package_name: chosen.name.clone(),
        package_dir: chosen.dir.clone(),
        driver_dir,
        sandbox_name,
    })
}

fn enumerate_packages(
    descriptor: &Path,
    workspace_root: &Path,
) -> Result<Vec<PackageEntry>, ConventionError> {
    let text = std::fs::read_to_string(descriptor).map_err(|source| ConventionError::Io {
        path: descriptor.to_path_buf(),
        source,
    })?;
    let value: toml::Value = text.parse().map_err(|err: toml::de::Error| {
        ConventionError::Manifest {
            path: descriptor.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    let mut packages = Vec::new();
    if let Some(name) = value
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(toml::Value::as_str)
    {
        packages.push(PackageEntry {
            name: name.to_string(),
            dir: workspace_root.to_path_buf(),
            is_root: true,
        });
    }

    // A workspace descriptor is preferred over a single-package one: when a
    // [workspace] table exists, its members are enumerated as well.
    if let Some(members) = value
        .get("workspace")
        .and_then(|w| w.get("members"))
        .and_then(toml::Value::as_array)
    {
        for member in members {
            let Some(rel) = member.as_str() else { continue };
            if rel.contains('*') {
                tracing::warn!(member = rel, "glob workspace members are not enumerated");
                continue;
            }
            let dir = workspace_root.join(rel);
            let member_manifest = dir.join("Cargo.toml");
            let Ok(member_text) = std::fs::read_to_string(&member_manifest) else {
                tracing::warn!(path = %member_manifest.display(), "skipping unreadable member manifest");
                continue;
            };
            let Ok(member_value) = member_text.parse::<toml::Value>() else {
                tracing::warn!(path = %member_manifest.display(), "skipping unparseable member manifest");
                continue;
            };
            if let Some(name) = member_value
                .get("package")
                .and_then(|p| p.get("name"))
                .and_then(toml::Value::as_str)
            {
                packages.push(PackageEntry {
                    name: name.to_string(),
                    dir,
                    is_root: false,
                });
            }
        }
    }
    Ok(packages)
}

fn select_package<'a>(
    packages: &'a [PackageEntry],
    overrides: &ConventionOverrides,
    workspace_root: &Path,
) -> Result<&'a PackageEntry, ConventionError> {
    if let Some(wanted) = &overrides.package {
        return packages
            .iter()
            .find(|p| &p.name == wanted)
            .ok_or_else(|| ConventionError::PackageNotFound {
                name: wanted.clone(),
                available: packages.iter().map(|p| p.name.clone()).collect(),
            });
    }
    if let Some(root) = packages.iter().find(|p| p.is_root) {
        return Ok(root);
    }
    if packages.len() == 1 {
        return Ok(&packages[0]);
    }
    // Several members, no root package: prefer the member named after the
    // workspace directory, else fall back to the first in name order.
    let dir_name = workspace_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if let Some(matched) = packages.iter().find(|p| p.name == dir_name) {
        return Ok(matched);
    }
    let first = packages
        .iter()
        .min_by(|a, b| a.name.cmp(&b.name))
        .expect("packages is non-empty");
    tracing::warn!(
        selected = %first.name,
        "multiple workspace members and no root package; defaulting to first by name"
    );
    Ok(first)
}
