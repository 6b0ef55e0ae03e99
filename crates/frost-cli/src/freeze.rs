//! The `freeze` subcommand

use anyhow::Context;
use frost_core::SchemaVersion;
use frost_orchestrator::{
    ConventionOverrides, ExtractionChannel, FreezePipeline, FreezeRequest, OrchestrationError,
    ProcessSandboxRuntime,
};
use std::path::PathBuf;

/// Parsed arguments of `frost freeze`
pub(crate) struct FreezeArgs {
    pub(crate) version: String,
    pub(crate) force: bool,
    pub(crate) sandbox: Option<String>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) manifest_path: Option<PathBuf>,
    pub(crate) package: Option<String>,
    pub(crate) source_roots: Vec<PathBuf>,
}

/// Run one freeze; returns the process exit code
pub(crate) fn run(args: FreezeArgs) -> anyhow::Result<i32> {
    let working_dir = std::env::current_dir().context("cannot determine working directory")?;
    let version = match SchemaVersion::parse(&args.version) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(2);
        }
    };
    let fixtures_root = args
        .output
        .unwrap_or_else(|| working_dir.join("Fixtures"));

    let request = FreezeRequest {
        version,
        force: args.force,
        working_dir,
        fixtures_root,
        source_roots: args.source_roots,
        overrides: ConventionOverrides {
            manifest_path: args.manifest_path,
            package: args.package,
            sandbox: args.sandbox,
        },
    };

    let pipeline = FreezePipeline::new(
        ProcessSandboxRuntime::from_env(),
        ExtractionChannel::from_env(),
    );
    match pipeline.run(&request) {
        Ok(report) => {
            println!(
                "froze {} ({}) into {}",
                report.version,
                report.subject_type,
                report.fixture_dir.display()
            );
            println!("fingerprint: {}", report.fingerprint);
            print_scaffold("drift scaffold", &report.drift_scaffold);
            match &report.migration_scaffold {
                Some(outcome) => print_scaffold("migration scaffold", outcome),
                None => println!("migration scaffold: none (no preceding version or plan)"),
            }
            Ok(0)
        }
        Err(err) => {
            eprintln!("error: {err}");
            if let OrchestrationError::Discovery(discovery) = &err {
                if let Some(text) = discovery.remediation() {
                    eprintln!("\n{text}");
                }
            }
            Ok(exit_code(&err))
        }
    }
}

fn print_scaffold(label: &str, outcome: &frost_scaffold::ScaffoldOutcome) {
    let status = if outcome.created { "created" } else { "skipped (exists)" };
    println!("{label}: {} [{status}]", outcome.file_name.display());
}

/// Classified exit codes, stable for scripting
fn exit_code(err: &OrchestrationError) -> i32 {
    match err {
        OrchestrationError::Discovery(_) => 2,
        OrchestrationError::Convention(_) => 3,
        OrchestrationError::BuildFailed { .. } => 4,
        OrchestrationError::ExecutionFailed { .. } | OrchestrationError::Sandbox(_) => 5,
        OrchestrationError::ExtractionIncomplete { .. }
        | OrchestrationError::ManifestInvalid { .. } => 6,
        OrchestrationError::Store(_) => 7,
        OrchestrationError::Scaffold(_) => 8,
        OrchestrationError::Io { .. } => 1,
    }
}
