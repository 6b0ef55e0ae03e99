//! Structural source scan for schema annotations
//!
//! Walks source roots and parses every Rust file with tree-sitter, looking
//! for `#[frozen_schema(version = "...")]` and
//! `#[migration_plan("...", ...)]` on struct and enum items. The scan is
//! structural: attributes are located in the parse tree, never by text
//! matching, and both the bare and the namespaced attribute form
//! (`#[frost::frozen_schema(...)]`) are recognized.
//!
//! Files that cannot be read or parsed are skipped with a warning; a failed
//! file never aborts the scan.

use crate::error::DiscoveryError;
use frost_core::{MigrationPlanDeclaration, SchemaVersion, VersionDeclaration};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Attribute name for schema version declarations
const VERSION_ATTRIBUTE: &str = "frozen_schema";
/// Attribute name for migration plan declarations
const PLAN_ATTRIBUTE: &str = "migration_plan";

/// Flat result of scanning one or more source roots
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// All version declarations, in deterministic discovery order
    pub versions: Vec<VersionDeclaration>,
    /// All migration plan declarations, in deterministic discovery order
    pub migration_plans: Vec<MigrationPlanDeclaration>,
}

impl DiscoveryResult {
    /// Find the declaration for a specific version
    #[must_use]
    pub fn find_version(&self, version: &SchemaVersion) -> Option<&VersionDeclaration> {
        self.versions.iter().find(|d| &d.version == version)
    }

    /// Find the declaration for a specific version, or fail with remediation
    ///
    /// # Errors
    /// Returns [`DiscoveryError::NoVersionDeclarationFound`] when no scanned
    /// root declares the requested version.
    pub fn require_version(
        &self,
        version: &SchemaVersion,
    ) -> Result<&VersionDeclaration, DiscoveryError> {
        self.find_version(version)
            .ok_or_else(|| DiscoveryError::NoVersionDeclarationFound {
                requested: version.to_string(),
            })
    }

    /// Select the migration plan the pipeline will use
    ///
    /// At most one plan is expected. When several are declared the first in
    /// discovery order is picked deterministically and a warning is emitted;
    /// plans are never merged.
    #[must_use]
    pub fn select_migration_plan(&self) -> Option<&MigrationPlanDeclaration> {
        if self.migration_plans.len() > 1 {
            tracing::warn!(
                count = self.migration_plans.len(),
                selected = %self.migration_plans[0].type_identifier,
                "multiple migration plan declarations found; using the first discovered"
            );
        }
        self.migration_plans.first()
    }
}

/// Scan source roots for schema annotations
///
/// Roots are scanned in the given order; files within a root in sorted path
/// order, so discovery order is deterministic across runs.
///
/// # Errors
/// Returns [`DiscoveryError::DuplicateVersion`] when two types declare the
/// same version, or [`DiscoveryError::Io`] when a root itself cannot be
/// enumerated. Unreadable or unparseable files inside a root are skipped.
pub fn scan_roots(roots: &[PathBuf]) -> Result<DiscoveryResult, DiscoveryError> {
    let mut result = DiscoveryResult::default();
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    for root in roots {
        let mut files = Vec::new();
        collect_rust_files(root, &mut files)?;
        files.sort();
        for file in files {
            let source = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(err) => {
                    tracing::warn!(path = %file.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            scan_file(&file, &source, &mut result, &mut seen)?;
        }
    }

    tracing::debug!(
        versions = result.versions.len(),
        plans = result.migration_plans.len(),
        "discovery complete"
    );
    Ok(result)
}

fn collect_rust_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), DiscoveryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name == "target" {
            continue;
        }
        if path.is_dir() {
            collect_rust_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

fn scan_file(
    file: &Path,
    source: &str,
    result: &mut DiscoveryResult,
    seen: &mut BTreeMap<String, String>,
) -> Result<(), DiscoveryError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_rust::LANGUAGE.into())
        .map_err(|err| DiscoveryError::Grammar(err.to_string()))?;
    let Some(tree) = parser.parse(source, None) else {
        tracing::warn!(path = %file.display(), "skipping file that produced no parse tree");
        return Ok(());
    };
    visit(tree.root_node(), source.as_bytes(), file, result, seen)
}

/// A recognized annotation, before attachment to its item
struct ParsedAttribute {
    kind: AttributeKind,
    strings: Vec<String>,
    offset: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    FrozenSchema,
    MigrationPlan,
}

fn visit(
    node: Node<'_>,
    src: &[u8],
    file: &Path,
    result: &mut DiscoveryResult,
    seen: &mut BTreeMap<String, String>,
) -> Result<(), DiscoveryError> {
    let mut cursor = node.walk();
    let mut pending: Vec<ParsedAttribute> = Vec::new();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    for child in children {
        match child.kind() {
            "attribute_item" => {
                if let Some(attr) = parse_attribute(child, src) {
                    pending.push(attr);
                }
            }
            // Doc comments may sit between an attribute and its item.
            "line_comment" | "block_comment" => {}
            "struct_item" | "enum_item" => {
                let type_name = child
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(src).ok())
                    .unwrap_or_default()
                    .to_string();
                for attr in pending.drain(..) {
                    attach(attr, &type_name, file, result, seen)?;
                }
            }
            _ => {
                pending.clear();
                visit(child, src, file, result, seen)?;
            }
        }
    }
    Ok(())
}

fn attach(
    attr: ParsedAttribute,
    type_name: &str,
    file: &Path,
    result: &mut DiscoveryResult,
    seen: &mut BTreeMap<String, String>,
) -> Result<(), DiscoveryError> {
    match attr.kind {
        AttributeKind::FrozenSchema => {
            let Some(raw) = attr.strings.first() else {
                tracing::warn!(
                    path = %file.display(),
                    type_name,
                    "frozen_schema attribute without a version string; skipping"
                );
                return Ok(());
            };
            let version = match SchemaVersion::parse(raw) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(path = %file.display(), type_name, error = %err, "skipping declaration");
                    return Ok(());
                }
            };
            if let Some(first) = seen.get(version.as_str()) {
                return Err(DiscoveryError::DuplicateVersion {
                    version: version.to_string(),
                    first: first.clone(),
                    second: type_name.to_string(),
                });
            }
            seen.insert(version.to_string(), type_name.to_string());
            result.versions.push(VersionDeclaration {
                version,
                type_identifier: type_name.to_string(),
                source_file: file.to_path_buf(),
                source_offset: attr.offset,
            });
        }
        AttributeKind::MigrationPlan => {
            let mut versions = Vec::new();
            for raw in &attr.strings {
                match SchemaVersion::parse(raw) {
                    Ok(v) => versions.push(v),
                    Err(err) => {
                        tracing::warn!(
                            path = %file.display(),
                            type_name,
                            error = %err,
                            "ignoring malformed version in migration plan"
                        );
                    }
                }
            }
            result.migration_plans.push(MigrationPlanDeclaration {
                type_identifier: type_name.to_string(),
                source_file: file.to_path_buf(),
                versions,
            });
        }
    }
    Ok(())
}

fn parse_attribute(item: Node<'_>, src: &[u8]) -> Option<ParsedAttribute> {
    let mut cursor = item.walk();
    let attr = item
        .named_children(&mut cursor)
        .find(|n| n.kind() == "attribute")?;
    let path = attr.named_child(0)?;
    let path_text = path.utf8_text(src).ok()?;
    // Accept both `frozen_schema` and `frost::frozen_schema`; matching on
    // the final path segment covers every namespacing of the macro.
    let name = path_text.rsplit("::").next().unwrap_or(path_text).trim();
    let kind = match name {
        VERSION_ATTRIBUTE => AttributeKind::FrozenSchema,
        PLAN_ATTRIBUTE => AttributeKind::MigrationPlan,
        _ => return None,
    };
    let mut strings = Vec::new();
    let mut args_cursor = attr.walk();
    for child in attr.named_children(&mut args_cursor) {
        if child.kind() == "token_tree" {
            collect_string_literals(child, src, &mut strings);
        }
    }
    Some(ParsedAttribute {
        kind,
        strings,
        offset: item.start_byte(),
    })
}

fn collect_string_literals(node: Node<'_>, src: &[u8], out: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "string_literal" {
            if let Ok(text) = child.utf8_text(src) {
                out.push(text.trim_matches('"').to_string());
            }
        } else {
            collect_string_literals(child, src, out);
        }
    }
}
