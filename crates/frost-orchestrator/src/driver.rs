//! Ephemeral driver unit generation
//!
//! A driver is a minimal generated integration test that invokes the opaque
//! per-version materialization hook. It is written into the execution
//! target's `tests/` directory and is temporary: the [`DriverUnit`] guard
//! removes it on every exit path, success and failure alike.

use crate::conventions::ProjectConventions;
use crate::error::OrchestrationError;
use frost_core::SchemaVersion;
use std::path::{Path, PathBuf};

/// RAII guard over a generated driver file
///
/// Dropping the guard deletes the file; the pipeline holds it across the
/// build-and-execute step so that no exit path leaves a driver behind.
#[derive(Debug)]
pub struct DriverUnit {
    path: PathBuf,
    test_name: String,
}

impl DriverUnit {
    /// Generate a uniquely named driver for one version
    ///
    /// # Errors
    /// Returns [`OrchestrationError::Io`] if the driver cannot be written.
    pub fn generate(
        conventions: &ProjectConventions,
        version: &SchemaVersion,
    ) -> Result<Self, OrchestrationError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let test_name = format!("frost_driver_{}_{}", version.safe_name(), &nonce[..8]);
        let path = conventions.driver_dir.join(format!("{test_name}.rs"));

        std::fs::create_dir_all(&conventions.driver_dir).map_err(|source| {
            OrchestrationError::Io {
                path: conventions.driver_dir.clone(),
                source,
            }
        })?;
        let source_text = driver_source(&conventions.package_name, version);
        std::fs::write(&path, source_text).map_err(|source| OrchestrationError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "driver generated");
        Ok(Self { path, test_name })
    }

    /// Path of the generated driver file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cargo test-target name of the driver
    #[inline]
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }
}

impl Drop for DriverUnit {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove driver");
            }
        } else {
            tracing::debug!(path = %self.path.display(), "driver removed");
        }
    }
}

/// Render the driver source for one version
///
/// The driver calls the generated materialization hook exported by the
/// build package and hands it the export directory from the environment.
fn driver_source(package_name: &str, version: &SchemaVersion) -> String {
    let crate_ident = package_name.replace('-', "_");
    let hook = format!("__frost_materialize_{}", version.safe_name());
    format!(
        r#"// Generated by frost for schema {version}; removed automatically after the run.

#[test]
fn materialize_frozen_schema() {{
    let export_dir = std::env::var("FROST_EXPORT_DIR")
        .expect("FROST_EXPORT_DIR is set by the frost pipeline");
    {crate_ident}::{hook}(std::path::Path::new(&export_dir))
        .expect("schema materialization hook failed");
}}
"#
    )
}
