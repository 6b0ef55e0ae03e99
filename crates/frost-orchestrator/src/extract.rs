//! Extraction channel (dead-drop)
//!
//! The sandbox's per-run storage is deleted the instant execution ends, so
//! the materialization hook copies its artifacts into a fixed, durable,
//! host-visible path *before* the sandbox exits. Extraction reads only this
//! dead-drop, never the sandbox's own storage, and refuses partial sets.

use crate::error::OrchestrationError;
use frost_core::{SchemaVersion, StructuralManifest};
use std::path::{Path, PathBuf};

/// Environment variable carrying the export root into the driver
pub const EXPORT_DIR_ENV: &str = "FROST_EXPORT_DIR";

/// Artifacts read back from the dead-drop after execution
#[derive(Debug, Clone)]
pub struct ExtractedArtifacts {
    /// Exported binary snapshot
    pub snapshot: PathBuf,
    /// Exported manifest file
    pub manifest_path: PathBuf,
    /// Parsed structural manifest
    pub manifest: StructuralManifest,
    /// Export metadata record (origin path, timestamp, version)
    pub export_metadata: PathBuf,
}

/// The fixed durable side-channel location, namespaced by version
#[derive(Debug, Clone)]
pub struct ExtractionChannel {
    export_root: PathBuf,
}

impl ExtractionChannel {
    /// Use an explicit export root
    #[inline]
    #[must_use]
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
        }
    }

    /// Use `FROST_EXPORT_DIR`, or the well-known default under the system
    /// temporary directory
    #[must_use]
    pub fn from_env() -> Self {
        let export_root = std::env::var(EXPORT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("frost-exports"));
        Self { export_root }
    }

    /// Dead-drop directory for one version
    #[inline]
    #[must_use]
    pub fn version_dir(&self, version: &SchemaVersion) -> PathBuf {
        self.export_root.join(version.as_str())
    }

    /// Artifact filenames the hook is contracted to drop
    #[must_use]
    pub fn expected_files(version: &SchemaVersion) -> [String; 3] {
        let safe = version.safe_name();
        [
            format!("snapshot-{safe}.db"),
            format!("manifest-{safe}.json"),
            format!("export_metadata-{safe}.txt"),
        ]
    }

    /// Prepare a clean dead-drop directory before execution
    ///
    /// Removes any stale content from prior runs so leftovers can never
    /// satisfy the completeness check.
    ///
    /// # Errors
    /// Returns [`OrchestrationError::Io`] on filesystem failure.
    pub fn prepare(&self, version: &SchemaVersion) -> Result<PathBuf, OrchestrationError> {
        let dir = self.version_dir(version);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|source| OrchestrationError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        std::fs::create_dir_all(&dir).map_err(|source| OrchestrationError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Read the artifact set after execution, verifying completeness
    ///
    /// # Errors
    /// Returns [`OrchestrationError::ExtractionIncomplete`] naming exactly
    /// the missing files when the set is partial, or
    /// [`OrchestrationError::ManifestInvalid`] when the exported manifest
    /// does not parse.
    pub fn collect(&self, version: &SchemaVersion) -> Result<ExtractedArtifacts, OrchestrationError> {
        let dir = self.version_dir(version);
        let [snapshot_name, manifest_name, metadata_name] = Self::expected_files(version);

        let missing: Vec<String> = [&snapshot_name, &manifest_name, &metadata_name]
            .into_iter()
            .filter(|f| !dir.join(f).is_file())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(OrchestrationError::ExtractionIncomplete { missing });
        }

        let manifest_path = dir.join(&manifest_name);
        let bytes = std::fs::read(&manifest_path).map_err(|source| OrchestrationError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest = StructuralManifest::from_json(&bytes).map_err(|source| {
            OrchestrationError::ManifestInvalid {
                path: manifest_path.clone(),
                source,
            }
        })?;

        tracing::debug!(dir = %dir.display(), "extraction complete");
        Ok(ExtractedArtifacts {
            snapshot: dir.join(&snapshot_name),
            manifest_path,
            manifest,
            export_metadata: dir.join(&metadata_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn drop_artifacts(dir: &Path, version: &SchemaVersion, skip: &[&str]) {
        let safe = version.safe_name();
        let manifest = StructuralManifest::new(vec!["User".into()]);
        let files = [
            (format!("snapshot-{safe}.db"), b"snapshot".to_vec()),
            (
                format!("manifest-{safe}.json"),
                manifest.to_json_pretty().unwrap(),
            ),
            (
                format!("export_metadata-{safe}.txt"),
                format!("version: {version}\n").into_bytes(),
            ),
        ];
        for (name, content) in files {
            if skip.contains(&name.as_str()) {
                continue;
            }
            fs::write(dir.join(name), content).unwrap();
        }
    }

    #[test]
    fn collect_reads_complete_set() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = ExtractionChannel::new(tmp.path());
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let dir = channel.prepare(&version).unwrap();
        drop_artifacts(&dir, &version, &[]);

        let artifacts = channel.collect(&version).unwrap();
        assert_eq!(artifacts.manifest.entity_count, 1);
        assert!(artifacts.snapshot.is_file());
        assert!(artifacts.export_metadata.is_file());
    }

    #[test]
    fn collect_names_exactly_the_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = ExtractionChannel::new(tmp.path());
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let dir = channel.prepare(&version).unwrap();
        drop_artifacts(&dir, &version, &["snapshot-1_0_0.db", "export_metadata-1_0_0.txt"]);

        let err = channel.collect(&version).unwrap_err();
        match err {
            OrchestrationError::ExtractionIncomplete { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        "snapshot-1_0_0.db".to_string(),
                        "export_metadata-1_0_0.txt".to_string()
                    ]
                );
            }
            other => panic!("expected ExtractionIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn prepare_clears_stale_leftovers() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = ExtractionChannel::new(tmp.path());
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let dir = channel.prepare(&version).unwrap();
        drop_artifacts(&dir, &version, &[]);

        // A second prepare must not let the old run's files satisfy
        // completeness for a new run.
        channel.prepare(&version).unwrap();
        let err = channel.collect(&version).unwrap_err();
        assert!(matches!(err, OrchestrationError::ExtractionIncomplete { .. }));
    }

    #[test]
    fn malformed_manifest_is_reported_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = ExtractionChannel::new(tmp.path());
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let dir = channel.prepare(&version).unwrap();
        drop_artifacts(&dir, &version, &["manifest-1_0_0.json"]);
        fs::write(dir.join("manifest-1_0_0.json"), b"not json").unwrap();

        let err = channel.collect(&version).unwrap_err();
        assert!(matches!(err, OrchestrationError::ManifestInvalid { .. }));
    }
}
