//! Structural schema manifests
//!
//! The manifest is the structural export of a schema version: entity names
//! and counts, no data values. Fingerprints are computed over the manifest's
//! canonical form rather than the binary snapshot, because binary store
//! formats contain non-deterministic bytes (timestamps, page noise).

use serde::{Deserialize, Serialize};

/// One entity (table/model) in the schema, structural metadata only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity name
    pub name: String,
}

/// Structural export of one schema version (`manifest-*.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralManifest {
    /// ISO-8601 export timestamp
    pub timestamp: String,
    /// Number of entities in the schema
    pub entity_count: usize,
    /// Entity records, in export order
    pub entities: Vec<EntityRecord>,
}

impl StructuralManifest {
    /// Build a manifest for the given entity names, stamped now
    #[must_use]
    pub fn new(entity_names: Vec<String>) -> Self {
        let entities: Vec<EntityRecord> = entity_names
            .into_iter()
            .map(|name| EntityRecord { name })
            .collect();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            entity_count: entities.len(),
            entities,
        }
    }

    /// Parse a manifest from JSON bytes
    ///
    /// # Errors
    /// Returns [`ManifestError::Json`] on malformed input.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`ManifestError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, ManifestError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Canonical bytes for fingerprinting
    ///
    /// Timestamp-free and entity-sorted, so the same schema structure always
    /// canonicalizes to the same bytes no matter when it was exported.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut names: Vec<&str> = self.entities.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        let canonical = serde_json::json!({
            "entity_count": self.entity_count,
            "entities": names,
        });
        canonical.to_string().into_bytes()
    }
}

/// Errors when reading or writing manifests
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Malformed or unserializable manifest JSON
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
