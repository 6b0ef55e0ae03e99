//! Error types for the fixture store

use std::path::PathBuf;

/// Errors from fixture store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A fixture directory already exists for this version
    ///
    /// Fixtures are immutable; re-freezing requires an explicit force.
    #[error("fixtures for version {version} already exist at {} (use --force to replace)", dir.display())]
    AlreadyExists {
        /// The version whose directory exists
        version: String,
        /// The existing fixture directory
        dir: PathBuf,
    },

    /// A committed fixture directory is missing an expected artifact
    #[error("fixture set for version {version} is missing {file}")]
    MissingArtifact {
        /// The version whose set is incomplete
        version: String,
        /// Name of the missing artifact file
        file: String,
    },

    /// Stored fingerprint file does not contain a valid fingerprint
    #[error("stored fingerprint for version {version} is unreadable: {source}")]
    BadFingerprint {
        /// The version whose fingerprint is corrupt
        version: String,
        /// Underlying parse error
        #[source]
        source: frost_core::FingerprintError,
    },

    /// Stored manifest is not valid manifest JSON
    #[error("stored manifest for version {version} is unreadable: {source}")]
    BadManifest {
        /// The version whose manifest is corrupt
        version: String,
        /// Underlying parse error
        #[source]
        source: frost_core::ManifestError,
    },

    /// Filesystem failure
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
