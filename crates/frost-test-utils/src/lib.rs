//! Testing utilities for the frost workspace
//!
//! Provides [`TempProject`], a throwaway user project with annotated schema
//! sources, and [`FakeSandboxRuntime`], a scripted sandbox that dead-drops
//! artifacts the way a real materialization hook does. Integration tests
//! drive the whole pipeline against these without touching cargo or a real
//! sandbox.

#![warn(unreachable_pub)]

use frost_core::{SchemaVersion, StructuralManifest};
use frost_orchestrator::{
    ProcessOutput, RunRequest, SandboxError, SandboxInfo, SandboxRuntime, EXPORT_DIR_ENV,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A temporary single-package user project
///
/// Holds its backing directory alive; dropping the value removes the
/// project from disk.
#[derive(Debug)]
pub struct TempProject {
    dir: tempfile::TempDir,
}

impl TempProject {
    /// Create a project with a `Cargo.toml` and an empty `src/lib.rs`
    ///
    /// # Panics
    /// Panics on filesystem failure; this is test-only code.
    #[must_use]
    pub fn new(package: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp project dir");
        fs::write(
            dir.path().join("Cargo.toml"),
            format!("[package]\nname = \"{package}\"\nedition = \"2021\"\n"),
        )
        .expect("write Cargo.toml");
        fs::create_dir_all(dir.path().join("src")).expect("create src");
        fs::write(dir.path().join("src/lib.rs"), "").expect("write lib.rs");
        Self { dir }
    }

    /// Project root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Conventional fixture store root (`<root>/Fixtures`)
    #[must_use]
    pub fn fixtures_root(&self) -> PathBuf {
        self.root().join("Fixtures")
    }

    /// Conventional user tests directory (`<root>/tests`)
    #[must_use]
    pub fn tests_dir(&self) -> PathBuf {
        self.root().join("tests")
    }

    /// Write a source file relative to the project root
    ///
    /// # Panics
    /// Panics on filesystem failure.
    pub fn write_source(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source dir");
        }
        fs::write(path, content).expect("write source file");
    }

    /// Add a `#[frozen_schema]` declaration in its own source file
    pub fn add_schema(&self, version: &str, type_name: &str) {
        self.write_source(
            &format!("src/schema_{}.rs", version.replace('.', "_")),
            &format!("#[frozen_schema(version = \"{version}\")]\npub struct {type_name};\n"),
        );
    }

    /// Add a `#[migration_plan]` declaration in its own source file
    pub fn add_migration_plan(&self, type_name: &str, versions: &[&str]) {
        let list = versions
            .iter()
            .map(|v| format!("\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_source(
            "src/migration_plan.rs",
            &format!("#[migration_plan({list})]\npub struct {type_name};\n"),
        );
    }
}

/// Write the artifact set a materialization hook dead-drops
///
/// # Panics
/// Panics on filesystem failure; this is test-only code.
pub fn write_export_artifacts(export_dir: &Path, version: &SchemaVersion, entities: &[&str]) {
    let safe = version.safe_name();
    let manifest = StructuralManifest::new(entities.iter().map(|s| s.to_string()).collect());
    fs::write(
        export_dir.join(format!("snapshot-{safe}.db")),
        b"fake binary snapshot",
    )
    .expect("write snapshot");
    fs::write(
        export_dir.join(format!("manifest-{safe}.json")),
        manifest.to_json_pretty().expect("serialize manifest"),
    )
    .expect("write manifest");
    fs::write(
        export_dir.join(format!("export_metadata-{safe}.txt")),
        format!("origin: /sandbox/ephemeral/store.db\nversion: {version}\n"),
    )
    .expect("write export metadata");
}

/// What the fake runtime should do when `run` is called
#[derive(Debug, Clone)]
pub enum RunBehavior {
    /// Report success and dead-drop a full artifact set for the version
    DropArtifacts {
        /// Version whose artifact names are used
        version: SchemaVersion,
        /// Entity names placed in the manifest
        entities: Vec<String>,
        /// Artifact filenames to withhold, for incompleteness tests
        withhold: Vec<String>,
    },
    /// Report a failed process with this combined output
    Fail {
        /// Combined stdout/stderr handed back
        output: String,
    },
    /// Report success without dropping anything
    SucceedSilently,
}

/// A scripted, in-memory sandbox runtime
#[derive(Debug)]
pub struct FakeSandboxRuntime {
    /// Inventory returned by `list`
    pub inventory: Vec<SandboxInfo>,
    /// Behavior of `run`
    pub behavior: RunBehavior,
    /// Identifiers passed to `boot`, in call order
    pub booted: Mutex<Vec<String>>,
    /// Requests passed to `run`, in call order
    pub runs: Mutex<Vec<RunRequest>>,
}

impl FakeSandboxRuntime {
    /// A runtime with one sandbox named `frost-default` and this behavior
    #[must_use]
    pub fn with_behavior(behavior: RunBehavior) -> Self {
        Self {
            inventory: vec![SandboxInfo {
                id: "sb-0001".to_string(),
                name: "frost-default".to_string(),
                state: "shutdown".to_string(),
            }],
            behavior,
            booted: Mutex::new(Vec::new()),
            runs: Mutex::new(Vec::new()),
        }
    }

    /// A runtime whose hook drops a full artifact set for `version`
    #[must_use]
    pub fn dropping(version: &SchemaVersion, entities: &[&str]) -> Self {
        Self::with_behavior(RunBehavior::DropArtifacts {
            version: version.clone(),
            entities: entities.iter().map(|s| s.to_string()).collect(),
            withhold: Vec::new(),
        })
    }
}

impl SandboxRuntime for FakeSandboxRuntime {
    fn list(&self) -> Result<Vec<SandboxInfo>, SandboxError> {
        Ok(self.inventory.clone())
    }

    fn boot(&self, id: &str) -> Result<(), SandboxError> {
        self.booted.lock().expect("booted lock").push(id.to_string());
        Ok(())
    }

    fn run(&self, request: &RunRequest) -> Result<ProcessOutput, SandboxError> {
        self.runs.lock().expect("runs lock").push(request.clone());
        match &self.behavior {
            RunBehavior::DropArtifacts {
                version,
                entities,
                withhold,
            } => {
                let export_dir = request
                    .env
                    .iter()
                    .find(|(k, _)| k == EXPORT_DIR_ENV)
                    .map(|(_, v)| PathBuf::from(v))
                    .expect("pipeline must export FROST_EXPORT_DIR");
                let entity_refs: Vec<&str> = entities.iter().map(String::as_str).collect();
                write_export_artifacts(&export_dir, version, &entity_refs);
                for name in withhold {
                    let _ = fs::remove_file(export_dir.join(name));
                }
                Ok(ProcessOutput {
                    status_ok: true,
                    combined: "test result: ok. 1 passed; 0 failed".to_string(),
                })
            }
            RunBehavior::Fail { output } => Ok(ProcessOutput {
                status_ok: false,
                combined: output.clone(),
            }),
            RunBehavior::SucceedSilently => Ok(ProcessOutput {
                status_ok: true,
                combined: "test result: ok. 1 passed; 0 failed".to_string(),
            }),
        }
    }
}
