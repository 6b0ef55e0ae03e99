//! Orchestration error taxonomy
//!
//! Failure conditions are classified, not generic: build, execution,
//! sandbox, and extraction failures are programmatically distinguishable
//! while retaining the raw toolchain output operators need for diagnosis.

use crate::sandbox::SandboxError;
use frost_discovery::DiscoveryError;
use frost_scaffold::ScaffoldError;
use frost_store::StoreError;
use std::path::PathBuf;

/// Top-level error of the freeze pipeline
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    /// Conventions could not be resolved
    #[error(transparent)]
    Convention(#[from] ConventionError),

    /// Annotation discovery failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Sandbox control failed
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// The toolchain reported a compile failure
    #[error("build failed; toolchain output:\n{output}")]
    BuildFailed {
        /// Combined stdout/stderr of the toolchain, verbatim
        output: String,
    },

    /// The driver ran and failed inside the sandbox
    #[error("driver execution failed; toolchain output:\n{output}")]
    ExecutionFailed {
        /// Combined stdout/stderr of the toolchain, verbatim
        output: String,
    },

    /// The dead-drop is missing part of the expected artifact set
    #[error("extraction incomplete; missing: {}", missing.join(", "))]
    ExtractionIncomplete {
        /// Exactly the files absent from the side channel
        missing: Vec<String>,
    },

    /// An exported manifest did not parse
    #[error("exported manifest {} is invalid: {source}", path.display())]
    ManifestInvalid {
        /// The unparseable manifest file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: frost_core::ManifestError,
    },

    /// Fixture store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Scaffold write failure
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    /// Filesystem failure in the pipeline itself
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Errors resolving project conventions
#[derive(Debug, thiserror::Error)]
pub enum ConventionError {
    /// No build descriptor in the working directory
    #[error("no Cargo.toml build descriptor found in {}", dir.display())]
    NoBuildDescriptorFound {
        /// The directory searched
        dir: PathBuf,
    },

    /// Descriptor exists but is unparseable
    #[error("cannot parse build descriptor {}: {message}", path.display())]
    Manifest {
        /// The unparseable descriptor
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Descriptor declares no packages at all
    #[error("build descriptor {} declares no packages", path.display())]
    NoPackages {
        /// The empty descriptor
        path: PathBuf,
    },

    /// An explicit `--package` named no enumerated package
    #[error("package '{name}' not found; available: {}", available.join(", "))]
    PackageNotFound {
        /// The requested package
        name: String,
        /// Packages the descriptor enumerates
        available: Vec<String>,
    },

    /// Filesystem failure reading descriptors
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Classify a failed combined build-and-test invocation
///
/// Compile failures and runtime failures surface differently to the user;
/// the raw output is retained verbatim either way.
#[must_use]
pub fn classify_toolchain_failure(output: &str) -> OrchestrationError {
    let build_markers = ["error[E", "could not compile", "error: linking with"];
    if build_markers.iter().any(|m| output.contains(m)) {
        OrchestrationError::BuildFailed {
            output: output.to_string(),
        }
    } else {
        OrchestrationError::ExecutionFailed {
            output: output.to_string(),
        }
    }
}
