//! Durable, versioned fixture store
//!
//! One directory per frozen version under the store root, committed to the
//! project's source control. Every filename embeds the version's safe name
//! so that artifacts from different versions never collide when a build
//! unit includes them all.
//!
//! Fixture sets are immutable: commit refuses to touch an existing version
//! directory unless forced, and force replaces the directory wholesale.

use crate::error::StoreError;
use frost_core::{Fingerprint, SchemaVersion, StructuralManifest};
use std::path::{Path, PathBuf};

/// Artifact filenames for one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFileNames {
    /// Binary snapshot, `snapshot-<safe>.db`
    pub snapshot: String,
    /// Structural manifest, `manifest-<safe>.json`
    pub manifest: String,
    /// Content fingerprint, `fingerprint-<safe>.sha256`
    pub fingerprint: String,
    /// Export metadata record, `export_metadata-<safe>.txt`
    pub export_metadata: String,
}

impl FixtureFileNames {
    /// Filenames for a version
    #[must_use]
    pub fn for_version(version: &SchemaVersion) -> Self {
        let safe = version.safe_name();
        Self {
            snapshot: format!("snapshot-{safe}.db"),
            manifest: format!("manifest-{safe}.json"),
            fingerprint: format!("fingerprint-{safe}.sha256"),
            export_metadata: format!("export_metadata-{safe}.txt"),
        }
    }
}

/// Staged artifacts handed to [`FixtureStore::commit`]
///
/// Paths point at the extraction channel's files; commit copies them into
/// the version directory under their store names.
#[derive(Debug, Clone)]
pub struct FixtureArtifacts {
    /// Extracted binary snapshot
    pub snapshot: PathBuf,
    /// Extracted structural manifest
    pub manifest: PathBuf,
    /// Extracted export metadata record
    pub export_metadata: PathBuf,
    /// Fingerprint computed over the manifest's canonical form
    pub fingerprint: Fingerprint,
}

/// A fixture set loaded back from the store
#[derive(Debug, Clone)]
pub struct FixtureArtifactSet {
    /// The frozen version
    pub version: SchemaVersion,
    /// Path to the binary snapshot
    pub snapshot: PathBuf,
    /// Parsed structural manifest
    pub manifest: StructuralManifest,
    /// Path to the manifest file
    pub manifest_path: PathBuf,
    /// Stored content fingerprint
    pub fingerprint: Fingerprint,
    /// Path to the export metadata record
    pub export_metadata: PathBuf,
}

/// The versioned fixture store
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    /// Open a store rooted at the given fixtures directory
    ///
    /// The directory need not exist yet; it is created on first commit.
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one version's fixture set
    #[inline]
    #[must_use]
    pub fn version_dir(&self, version: &SchemaVersion) -> PathBuf {
        self.root.join(version.as_str())
    }

    /// Whether a fixture set exists for this version
    #[inline]
    #[must_use]
    pub fn contains(&self, version: &SchemaVersion) -> bool {
        self.version_dir(version).is_dir()
    }

    /// Commit a fixture set for a version
    ///
    /// Refuses an existing version directory unless `force`; with `force`
    /// the prior directory is removed entirely before writing, never merged.
    ///
    /// # Errors
    /// [`StoreError::AlreadyExists`] without force, [`StoreError::Io`] on
    /// filesystem failure.
    pub fn commit(
        &self,
        version: &SchemaVersion,
        artifacts: &FixtureArtifacts,
        force: bool,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.version_dir(version);
        if dir.exists() {
            if !force {
                return Err(StoreError::AlreadyExists {
                    version: version.to_string(),
                    dir,
                });
            }
            tracing::info!(version = %version, "force: replacing existing fixture set");
            std::fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        }
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let names = FixtureFileNames::for_version(version);
        copy_into(&artifacts.snapshot, &dir.join(&names.snapshot))?;
        copy_into(&artifacts.manifest, &dir.join(&names.manifest))?;
        copy_into(&artifacts.export_metadata, &dir.join(&names.export_metadata))?;

        let fingerprint_path = dir.join(&names.fingerprint);
        std::fs::write(&fingerprint_path, format!("{}\n", artifacts.fingerprint))
            .map_err(|e| StoreError::io(&fingerprint_path, e))?;

        tracing::info!(version = %version, dir = %dir.display(), "fixture set committed");
        Ok(dir)
    }

    /// Load the fixture set for a version, if one is committed
    ///
    /// # Errors
    /// [`StoreError::MissingArtifact`] when the directory exists but a file
    /// is absent; [`StoreError::BadManifest`] / [`StoreError::BadFingerprint`]
    /// on corrupt content.
    pub fn load(&self, version: &SchemaVersion) -> Result<Option<FixtureArtifactSet>, StoreError> {
        let dir = self.version_dir(version);
        if !dir.is_dir() {
            return Ok(None);
        }
        let names = FixtureFileNames::for_version(version);
        for file in [&names.snapshot, &names.manifest, &names.fingerprint, &names.export_metadata] {
            if !dir.join(file).is_file() {
                return Err(StoreError::MissingArtifact {
                    version: version.to_string(),
                    file: file.clone(),
                });
            }
        }

        let manifest_path = dir.join(&names.manifest);
        let manifest_bytes =
            std::fs::read(&manifest_path).map_err(|e| StoreError::io(&manifest_path, e))?;
        let manifest = StructuralManifest::from_json(&manifest_bytes).map_err(|source| {
            StoreError::BadManifest {
                version: version.to_string(),
                source,
            }
        })?;

        let fingerprint_path = dir.join(&names.fingerprint);
        let fingerprint_text = std::fs::read_to_string(&fingerprint_path)
            .map_err(|e| StoreError::io(&fingerprint_path, e))?;
        let fingerprint: Fingerprint =
            fingerprint_text
                .parse()
                .map_err(|source| StoreError::BadFingerprint {
                    version: version.to_string(),
                    source,
                })?;

        Ok(Some(FixtureArtifactSet {
            version: version.clone(),
            snapshot: dir.join(&names.snapshot),
            manifest,
            manifest_path,
            fingerprint,
            export_metadata: dir.join(&names.export_metadata),
        }))
    }

    /// List committed versions in ascending numeric order
    ///
    /// Only entries matching the strict version pattern are admitted; junk,
    /// hidden files, and malformed names are silently excluded.
    ///
    /// # Errors
    /// [`StoreError::Io`] when an existing root cannot be read.
    pub fn list_versions(&self) -> Result<Vec<SchemaVersion>, StoreError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let mut versions = Vec::new();
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !SchemaVersion::is_valid_name(&name) {
                continue;
            }
            if let Ok(version) = SchemaVersion::parse(&name) {
                versions.push(version);
            }
        }
        versions.sort();
        Ok(versions)
    }
}

fn copy_into(from: &Path, to: &Path) -> Result<(), StoreError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| StoreError::io(to, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::StructuralManifest;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn staged(dir: &Path, version: &SchemaVersion, entities: &[&str]) -> FixtureArtifacts {
        let manifest = StructuralManifest::new(entities.iter().map(|s| s.to_string()).collect());
        let snapshot = dir.join("snapshot.db");
        let manifest_path = dir.join("manifest.json");
        let metadata = dir.join("export_metadata.txt");
        fs::write(&snapshot, b"binary snapshot bytes").unwrap();
        fs::write(&manifest_path, manifest.to_json_pretty().unwrap()).unwrap();
        fs::write(&metadata, format!("version: {version}\n")).unwrap();
        FixtureArtifacts {
            snapshot,
            manifest: manifest_path,
            export_metadata: metadata,
            fingerprint: Fingerprint::of_manifest(&manifest),
        }
    }

    #[test]
    fn commit_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("Fixtures"));
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let artifacts = staged(tmp.path(), &version, &["User", "Post"]);

        let dir = store.commit(&version, &artifacts, false).unwrap();
        assert!(dir.join("snapshot-1_0_0.db").is_file());
        assert!(dir.join("manifest-1_0_0.json").is_file());
        assert!(dir.join("fingerprint-1_0_0.sha256").is_file());
        assert!(dir.join("export_metadata-1_0_0.txt").is_file());

        let loaded = store.load(&version).unwrap().unwrap();
        assert_eq!(loaded.fingerprint, artifacts.fingerprint);
        assert_eq!(loaded.manifest.entity_count, 2);
    }

    #[test]
    fn commit_refuses_existing_version_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("Fixtures"));
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let artifacts = staged(tmp.path(), &version, &["User"]);

        store.commit(&version, &artifacts, false).unwrap();
        let before = fs::read(store.version_dir(&version).join("manifest-1_0_0.json")).unwrap();

        let err = store.commit(&version, &artifacts, false).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        // Existing directory untouched byte for byte.
        let after = fs::read(store.version_dir(&version).join("manifest-1_0_0.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn force_replaces_fully_without_merging() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("Fixtures"));
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let artifacts = staged(tmp.path(), &version, &["User"]);
        let dir = store.commit(&version, &artifacts, false).unwrap();

        // A stray file from the old generation must not survive a force.
        fs::write(dir.join("stray.txt"), b"left behind").unwrap();

        store.commit(&version, &artifacts, true).unwrap();
        assert!(!dir.join("stray.txt").exists());
        assert!(dir.join("snapshot-1_0_0.db").is_file());
    }

    #[test]
    fn load_missing_version_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("Fixtures"));
        let version = SchemaVersion::parse("4.0.0").unwrap();
        assert!(store.load(&version).unwrap().is_none());
    }

    #[test]
    fn load_incomplete_set_names_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("Fixtures"));
        let version = SchemaVersion::parse("1.0.0").unwrap();
        let artifacts = staged(tmp.path(), &version, &["User"]);
        let dir = store.commit(&version, &artifacts, false).unwrap();
        fs::remove_file(dir.join("snapshot-1_0_0.db")).unwrap();

        let err = store.load(&version).unwrap_err();
        match err {
            StoreError::MissingArtifact { file, .. } => assert_eq!(file, "snapshot-1_0_0.db"),
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn list_versions_filters_junk_and_sorts_numerically() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Fixtures");
        for dir in ["1.0.0", "1.9.0", "1.10.0", "1.11.0", "2.0.0", ".git", "v1.5.0"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("README.md"), b"docs").unwrap();

        let store = FixtureStore::new(&root);
        let versions: Vec<String> = store
            .list_versions()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(versions, vec!["1.0.0", "1.9.0", "1.10.0", "1.11.0", "2.0.0"]);
    }

    #[test]
    fn list_versions_on_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(tmp.path().join("does-not-exist"));
        assert!(store.list_versions().unwrap().is_empty());
    }

    #[test]
    fn filenames_embed_safe_version() {
        let version = SchemaVersion::parse("1.10.0").unwrap();
        let names = FixtureFileNames::for_version(&version);
        assert_eq!(names.snapshot, "snapshot-1_10_0.db");
        assert_eq!(names.manifest, "manifest-1_10_0.json");
        assert_eq!(names.fingerprint, "fingerprint-1_10_0.sha256");
        assert_eq!(names.export_metadata, "export_metadata-1_10_0.txt");
    }
}
