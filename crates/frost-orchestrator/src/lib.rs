//! Frost execution orchestration
//!
//! Coordinates the external toolchain and sandbox runtime for one freeze:
//! resolves project conventions, generates an ephemeral driver, runs one
//! combined build-and-test step inside a booted sandbox, extracts the
//! artifact set from the dead-drop, commits it to the fixture store, and
//! scaffolds verification tests.

#![warn(unreachable_pub)]

pub mod conventions;
mod driver;
mod error;
mod extract;
mod pipeline;
pub mod sandbox;

pub use conventions::{ConventionOverrides, ProjectConventions, DEFAULT_SANDBOX_NAME};
pub use driver::DriverUnit;
pub use error::{classify_toolchain_failure, ConventionError, OrchestrationError};
pub use extract::{ExtractedArtifacts, ExtractionChannel, EXPORT_DIR_ENV};
pub use pipeline::{FreezePipeline, FreezeReport, FreezeRequest};
pub use sandbox::{
    resolve_sandbox, ProcessOutput, ProcessSandboxRuntime, RunRequest, SandboxError, SandboxInfo,
    SandboxRuntime,
};
