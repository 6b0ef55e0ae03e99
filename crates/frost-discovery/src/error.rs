//! Error types for annotation discovery

use std::path::PathBuf;

/// Errors during annotation discovery
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The same version string is declared by two types
    #[error("duplicate schema version {version}: declared by `{first}` and `{second}`")]
    DuplicateVersion {
        /// The offending version string
        version: String,
        /// Type carrying the first declaration found
        first: String,
        /// Type carrying the second declaration found
        second: String,
    },

    /// The requested version has no declaration anywhere in the scanned roots
    #[error("no #[frozen_schema] declaration found for version {requested}")]
    NoVersionDeclarationFound {
        /// The version the caller asked to freeze
        requested: String,
    },

    /// A source root could not be enumerated
    #[error("cannot read source root {}: {source}", path.display())]
    Io {
        /// The unreadable root
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The Rust grammar could not be loaded into the parser
    #[error("rust grammar unavailable: {0}")]
    Grammar(String),
}

impl DiscoveryError {
    /// Remediation text for a user-facing miss
    ///
    /// Shows the exact declaration to add so the error is recoverable
    /// without reading documentation.
    #[must_use]
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::NoVersionDeclarationFound { requested } => Some(format!(
                "annotate the schema type for this version, for example:\n\n    \
                 #[frozen_schema(version = \"{requested}\")]\n    \
                 pub struct AppSchema;\n\n\
                 then re-run `frost freeze {requested}`"
            )),
            _ => None,
        }
    }
}
