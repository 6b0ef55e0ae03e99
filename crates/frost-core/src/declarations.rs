//! Discovered schema declarations
//!
//! Read-only records produced by annotation discovery. A
//! [`VersionDeclaration`] is one `#[frozen_schema]` type; a
//! [`MigrationPlanDeclaration`] is one `#[migration_plan]` type.

use crate::version::SchemaVersion;
use std::path::PathBuf;

/// One discovered `#[frozen_schema(version = "...")]` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDeclaration {
    /// The declared schema version (unique across a project)
    pub version: SchemaVersion,
    /// Name of the annotated type
    pub type_identifier: String,
    /// Source file containing the declaration
    pub source_file: PathBuf,
    /// Byte offset of the attribute within the source file
    pub source_offset: usize,
}

/// One discovered `#[migration_plan("1.0.0", "2.0.0", ...)]` declaration
///
/// The version list is kept in declaration order; it describes the upgrade
/// path between frozen versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlanDeclaration {
    /// Name of the annotated type
    pub type_identifier: String,
    /// Source file containing the declaration
    pub source_file: PathBuf,
    /// Ordered versions forming the upgrade path
    pub versions: Vec<SchemaVersion>,
}
