//! The freeze pipeline
//!
//! Sequences one freeze invocation end to end:
//!
//! `Idle → DriverGenerated → Built → SandboxBooted → Executed → Extracted →
//! Cleaned`
//!
//! Strictly sequential: extraction never runs before execution completes,
//! the store commit never runs before extraction is complete, and
//! scaffolding never runs before the commit succeeds. The generated driver
//! is removed on every exit path by its RAII guard.

use crate::conventions::{self, ConventionOverrides};
use crate::driver::DriverUnit;
use crate::error::{classify_toolchain_failure, OrchestrationError};
use crate::extract::{ExtractionChannel, EXPORT_DIR_ENV};
use crate::sandbox::{resolve_sandbox, RunRequest, SandboxRuntime};
use frost_core::{Fingerprint, SchemaVersion};
use frost_scaffold::{find_preceding_version, ScaffoldEngine, ScaffoldOutcome};
use frost_store::{FixtureArtifacts, FixtureStore, StoreError};
use std::path::PathBuf;

/// Everything one freeze invocation needs
#[derive(Debug, Clone)]
pub struct FreezeRequest {
    /// The version to freeze
    pub version: SchemaVersion,
    /// Replace an existing fixture set
    pub force: bool,
    /// Directory the command was invoked from
    pub working_dir: PathBuf,
    /// Fixture store root (`<root>/Fixtures` by convention)
    pub fixtures_root: PathBuf,
    /// Source roots to scan; empty means the whole workspace root
    pub source_roots: Vec<PathBuf>,
    /// Explicit convention overrides
    pub overrides: ConventionOverrides,
}

/// Summary of a successful freeze
#[derive(Debug, Clone)]
pub struct FreezeReport {
    /// The frozen version
    pub version: SchemaVersion,
    /// Type carrying the version declaration
    pub subject_type: String,
    /// Committed fixture directory
    pub fixture_dir: PathBuf,
    /// Fingerprint of the frozen structural export
    pub fingerprint: Fingerprint,
    /// Drift scaffold outcome
    pub drift_scaffold: ScaffoldOutcome,
    /// Migration-pair scaffold outcome, when a preceding version and a
    /// migration plan both exist
    pub migration_scaffold: Option<ScaffoldOutcome>,
}

/// Orchestrates freeze invocations over a sandbox runtime
pub struct FreezePipeline<R: SandboxRuntime> {
    runtime: R,
    channel: ExtractionChannel,
}

impl<R: SandboxRuntime> FreezePipeline<R> {
    /// Create a pipeline over a runtime and an extraction channel
    #[inline]
    #[must_use]
    pub fn new(runtime: R, channel: ExtractionChannel) -> Self {
        Self { runtime, channel }
    }

    /// The sandbox runtime this pipeline drives
    #[inline]
    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Run one freeze to completion
    ///
    /// # Errors
    /// Every failure is classified; see [`OrchestrationError`]. Nothing is
    /// retried, and partial artifact sets are never committed.
    pub fn run(&self, request: &FreezeRequest) -> Result<FreezeReport, OrchestrationError> {
        let version = &request.version;
        let store = FixtureStore::new(&request.fixtures_root);

        // Fail the forgotten --force case before paying for a build.
        if store.contains(version) && !request.force {
            return Err(StoreError::AlreadyExists {
                version: version.to_string(),
                dir: store.version_dir(version),
            }
            .into());
        }

        let conventions = conventions::resolve(&request.working_dir, &request.overrides)?;

        let roots = if request.source_roots.is_empty() {
            vec![conventions.workspace_root.clone()]
        } else {
            request.source_roots.clone()
        };
        let discovery = frost_discovery::scan_roots(&roots)?;
        let declaration = discovery.require_version(version)?.clone();
        tracing::info!(
            version = %version,
            subject = %declaration.type_identifier,
            file = %declaration.source_file.display(),
            "version declaration found"
        );

        let export_dir = self.channel.prepare(version)?;

        let driver = DriverUnit::generate(&conventions, version)?;
        tracing::info!(driver = driver.test_name(), "driver generated");

        let sandbox = resolve_sandbox(&self.runtime, &conventions.sandbox_name)?;
        self.runtime.boot(&sandbox.id)?;
        tracing::info!(sandbox = %sandbox.name, id = %sandbox.id, "sandbox booted");

        // One combined build-and-test step so the freshly generated driver
        // is compiled; a stale build artifact is never reused.
        let run = RunRequest {
            sandbox_id: sandbox.id.clone(),
            env: vec![(
                EXPORT_DIR_ENV.to_string(),
                export_dir.to_string_lossy().into_owned(),
            )],
            command: vec![
                "cargo".to_string(),
                "test".to_string(),
                "--manifest-path".to_string(),
                conventions.build_descriptor.to_string_lossy().into_owned(),
                "--package".to_string(),
                conventions.package_name.clone(),
                "--test".to_string(),
                driver.test_name().to_string(),
            ],
        };
        let output = self.runtime.run(&run)?;
        if !output.status_ok {
            return Err(classify_toolchain_failure(&output.combined));
        }
        tracing::info!("driver executed");

        let extracted = self.channel.collect(version)?;
        let fingerprint = Fingerprint::of_manifest(&extracted.manifest);

        let artifacts = FixtureArtifacts {
            snapshot: extracted.snapshot,
            manifest: extracted.manifest_path,
            export_metadata: extracted.export_metadata,
            fingerprint,
        };
        let fixture_dir = store.commit(version, &artifacts, request.force)?;

        let engine = ScaffoldEngine::new(&conventions.driver_dir);
        let drift_scaffold = engine.scaffold_drift(version, &declaration.type_identifier)?;

        let frozen = store.list_versions()?;
        let migration_scaffold = match find_preceding_version(version, &frozen) {
            None => {
                tracing::info!("first frozen version; no migration-pair scaffold");
                None
            }
            Some(preceding) => match discovery.select_migration_plan() {
                Some(plan) => Some(engine.scaffold_migration_pair(
                    preceding,
                    version,
                    &plan.type_identifier,
                )?),
                None => {
                    tracing::warn!(
                        from = %preceding,
                        to = %version,
                        "no migration plan declared; skipping migration-pair scaffold"
                    );
                    None
                }
            },
        };

        Ok(FreezeReport {
            version: version.clone(),
            subject_type: declaration.type_identifier,
            fixture_dir,
            fingerprint,
            drift_scaffold,
            migration_scaffold,
        })
    }
}
