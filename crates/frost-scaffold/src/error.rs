//! Error types for the scaffolding engine

use std::path::PathBuf;

/// Errors while writing scaffold files
///
/// An I/O failure here is fatal to the freeze: the version is already
/// committed but would be unverifiable without its scaffolds. A
/// pre-existing scaffold is not an error; it is reported as a skip.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// Filesystem failure writing a new scaffold
    #[error("cannot write scaffold at {}: {source}", path.display())]
    Io {
        /// Path the write targeted
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}
