//! Idempotent scaffold creation
//!
//! Scaffolds are created exactly once per `(subject, kind)` and become
//! user-owned the moment they exist: an existing file is never rewritten,
//! regardless of content, and is reported as skipped.

use crate::error::ScaffoldError;
use crate::templates;
use frost_core::SchemaVersion;
use std::path::{Path, PathBuf};

/// Result of one scaffold operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    /// Path of the scaffold file
    pub file_name: PathBuf,
    /// `true` if this call wrote the file; `false` if it already existed
    pub created: bool,
}

/// Writes verification-test skeletons into a user-owned tests directory
#[derive(Debug, Clone)]
pub struct ScaffoldEngine {
    tests_dir: PathBuf,
}

impl ScaffoldEngine {
    /// Create an engine writing into the given tests directory
    #[inline]
    #[must_use]
    pub fn new(tests_dir: impl Into<PathBuf>) -> Self {
        Self {
            tests_dir: tests_dir.into(),
        }
    }

    /// The tests directory scaffolds are written into
    #[inline]
    #[must_use]
    pub fn tests_dir(&self) -> &Path {
        &self.tests_dir
    }

    /// Create the drift-check skeleton for one frozen version
    ///
    /// # Errors
    /// Returns [`ScaffoldError::Io`] if a *new* file cannot be written; an
    /// existing file is a skip, not an error.
    pub fn scaffold_drift(
        &self,
        version: &SchemaVersion,
        subject: &str,
    ) -> Result<ScaffoldOutcome, ScaffoldError> {
        let file = self
            .tests_dir
            .join(format!("{}_drift_tests.rs", templates::snake_case(subject)));
        self.write_once(&file, || templates::drift_test_source(version, subject))
    }

    /// Create the migration-pair skeleton between two frozen versions
    ///
    /// # Errors
    /// Returns [`ScaffoldError::Io`] if a *new* file cannot be written.
    pub fn scaffold_migration_pair(
        &self,
        from: &SchemaVersion,
        to: &SchemaVersion,
        plan_type: &str,
    ) -> Result<ScaffoldOutcome, ScaffoldError> {
        let file = self.tests_dir.join(format!(
            "migrate_{}_to_{}_tests.rs",
            from.safe_name(),
            to.safe_name()
        ));
        self.write_once(&file, || templates::migration_pair_source(from, to, plan_type))
    }

    fn write_once(
        &self,
        file: &Path,
        render: impl FnOnce() -> String,
    ) -> Result<ScaffoldOutcome, ScaffoldError> {
        if file.exists() {
            tracing::info!(file = %file.display(), "scaffold exists; skipped");
            return Ok(ScaffoldOutcome {
                file_name: file.to_path_buf(),
                created: false,
            });
        }
        std::fs::create_dir_all(&self.tests_dir).map_err(|source| ScaffoldError::Io {
            path: self.tests_dir.clone(),
            source,
        })?;
        std::fs::write(file, render()).map_err(|source| ScaffoldError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        tracing::info!(file = %file.display(), "scaffold created");
        Ok(ScaffoldOutcome {
            file_name: file.to_path_buf(),
            created: true,
        })
    }
}

/// Find the greatest frozen version strictly less than `current`
///
/// Numeric ordering per segment; returns `None` when `current` is the first
/// frozen version, which is a normal outcome, not a failure.
#[must_use]
pub fn find_preceding_version<'a>(
    current: &SchemaVersion,
    frozen: &'a [SchemaVersion],
) -> Option<&'a SchemaVersion> {
    frozen.iter().filter(|v| *v < current).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn versions(strs: &[&str]) -> Vec<SchemaVersion> {
        strs.iter().map(|s| SchemaVersion::parse(s).unwrap()).collect()
    }

    #[test]
    fn scaffold_is_created_once_then_skipped_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = ScaffoldEngine::new(tmp.path().join("tests"));
        let version = SchemaVersion::parse("1.0.0").unwrap();

        let first = engine.scaffold_drift(&version, "AppSchemaV1").unwrap();
        assert!(first.created);
        let content_after_first = fs::read(&first.file_name).unwrap();

        let second = engine.scaffold_drift(&version, "AppSchemaV1").unwrap();
        assert!(!second.created);
        assert_eq!(first.file_name, second.file_name);

        // Byte-identical after the second call: zero writes happened.
        let content_after_second = fs::read(&second.file_name).unwrap();
        assert_eq!(content_after_first, content_after_second);
    }

    #[test]
    fn user_edits_survive_rescaffolding() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = ScaffoldEngine::new(tmp.path().join("tests"));
        let version = SchemaVersion::parse("1.0.0").unwrap();

        let outcome = engine.scaffold_drift(&version, "AppSchemaV1").unwrap();
        fs::write(&outcome.file_name, "// user owned now\n").unwrap();

        let again = engine.scaffold_drift(&version, "AppSchemaV1").unwrap();
        assert!(!again.created);
        assert_eq!(
            fs::read_to_string(&again.file_name).unwrap(),
            "// user owned now\n"
        );
    }

    #[test]
    fn migration_pair_file_names_both_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = ScaffoldEngine::new(tmp.path().join("tests"));
        let from = SchemaVersion::parse("1.0.0").unwrap();
        let to = SchemaVersion::parse("2.0.0").unwrap();

        let outcome = engine
            .scaffold_migration_pair(&from, &to, "AppMigrationPlan")
            .unwrap();
        assert!(outcome.created);
        assert!(outcome
            .file_name
            .ends_with("migrate_1_0_0_to_2_0_0_tests.rs"));
    }

    #[test]
    fn preceding_version_uses_numeric_ordering() {
        let frozen = versions(&["1.0.0", "1.9.0", "1.10.0", "1.11.0", "2.0.0"]);
        let current = SchemaVersion::parse("2.0.0").unwrap();
        let preceding = find_preceding_version(&current, &frozen).unwrap();
        assert_eq!(preceding.as_str(), "1.11.0");
    }

    #[test]
    fn preceding_version_of_first_freeze_is_none() {
        let frozen = versions(&["1.0.0"]);
        let current = SchemaVersion::parse("1.0.0").unwrap();
        assert!(find_preceding_version(&current, &frozen).is_none());
    }

    #[test]
    fn preceding_version_skips_greater_versions() {
        let frozen = versions(&["1.0.0", "2.0.0", "3.0.0"]);
        let current = SchemaVersion::parse("2.0.0").unwrap();
        let preceding = find_preceding_version(&current, &frozen).unwrap();
        assert_eq!(preceding.as_str(), "1.0.0");
    }
}
