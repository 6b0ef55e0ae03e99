//! Content fingerprints for drift detection
//!
//! Provides [`Fingerprint`], a strongly-typed SHA-256 digest computed over a
//! manifest's canonical structural form. Stored as hex in
//! `fingerprint-*.sha256` files.

use crate::manifest::StructuralManifest;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte SHA-256 content fingerprint
///
/// Immutable and cheap to clone (Copy). Two fingerprints compare equal
/// exactly when the canonical structural exports were byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Create a fingerprint from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create a fingerprint from a byte slice
    ///
    /// # Errors
    /// Returns an error if the slice length is not exactly 32 bytes.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() != 32 {
            return Err(FingerprintError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Compute the SHA-256 fingerprint of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut arr = [0u8; 32];
        arr.copy_from_slice(digest.as_slice());
        Self(arr)
    }

    /// Compute the fingerprint of a manifest's canonical structural form
    #[inline]
    #[must_use]
    pub fn of_manifest(manifest: &StructuralManifest) -> Self {
        Self::compute(&manifest.canonical_bytes())
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors when working with fingerprints
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Invalid digest length
    #[error("invalid fingerprint length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compute_is_deterministic() {
        let h1 = Fingerprint::compute(b"schema");
        let h2 = Fingerprint::compute(b"schema");
        assert_eq!(h1, h2);
    }

    #[test]
    fn compute_differs_for_different_data() {
        assert_ne!(Fingerprint::compute(b"a"), Fingerprint::compute(b"b"));
    }

    #[test]
    fn of_manifest_ignores_timestamp() {
        let mut a = StructuralManifest::new(vec!["User".into()]);
        let mut b = a.clone();
        a.timestamp = "2024-01-01T00:00:00Z".to_string();
        b.timestamp = "2025-01-01T00:00:00Z".to_string();
        assert_eq!(Fingerprint::of_manifest(&a), Fingerprint::of_manifest(&b));
    }

    #[test]
    fn of_manifest_detects_structural_change() {
        let a = StructuralManifest::new(vec!["User".into()]);
        let b = StructuralManifest::new(vec!["User".into(), "Post".into()]);
        assert_ne!(Fingerprint::of_manifest(&a), Fingerprint::of_manifest(&b));
    }

    #[test]
    fn display_and_parse_round_trip() {
        let fp = Fingerprint::compute(b"round trip");
        let s = fp.to_string();
        assert_eq!(s.len(), 64);
        let parsed: Fingerprint = s.parse().unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn parse_trims_trailing_newline() {
        let fp = Fingerprint::compute(b"file contents");
        let with_newline = format!("{fp}\n");
        let parsed: Fingerprint = with_newline.parse().unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let result = Fingerprint::from_slice(&[0u8; 31]);
        assert!(matches!(
            result,
            Err(FingerprintError::InvalidLength { expected: 32, actual: 31 })
        ));
    }
}
