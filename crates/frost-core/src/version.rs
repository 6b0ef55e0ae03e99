//! Schema version identifiers
//!
//! Provides [`SchemaVersion`], the strongly-typed, numerically ordered
//! version string used to key frozen fixtures.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Strict pattern for version strings: dot-separated numeric segments.
///
/// Entries in a fixture directory that do not match this pattern are not
/// versions and must be ignored by listings.
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("version pattern is valid"));

/// A schema version such as `1.10.0`
///
/// Ordering is numeric per segment, never lexicographic:
/// `1.9.0 < 1.10.0 < 1.11.0`. The original string is retained for display
/// and for naming fixture directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaVersion {
    raw: String,
    segments: Vec<u64>,
}

impl SchemaVersion {
    /// Parse a version string
    ///
    /// # Errors
    /// Returns [`VersionError::Invalid`] if the string is not dot-separated
    /// numeric segments, or if a segment overflows `u64`.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if !VERSION_PATTERN.is_match(s) {
            return Err(VersionError::Invalid(s.to_string()));
        }
        let segments = s
            .split('.')
            .map(|seg| seg.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::Invalid(s.to_string()))?;
        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }

    /// Check whether a string is a conforming version name
    ///
    /// Used by fixture listings to exclude junk directory entries.
    #[inline]
    #[must_use]
    pub fn is_valid_name(s: &str) -> bool {
        VERSION_PATTERN.is_match(s)
    }

    /// The version string exactly as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric segments of the version
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Filename-safe form: dots replaced with underscores
    ///
    /// Artifact files embed this so that two versions included in one build
    /// unit never collide on a bare basename.
    #[inline]
    #[must_use]
    pub fn safe_name(&self) -> String {
        self.raw.replace('.', "_")
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for SchemaVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for SchemaVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors from version parsing
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// String does not match the version pattern
    #[error("invalid schema version '{0}': expected dot-separated numeric segments like 1.0.0")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn parse_valid_versions() {
        for s in ["1", "1.0", "1.0.0", "0.1", "10.20.30", "2.0.0.1"] {
            let v = SchemaVersion::parse(s).unwrap();
            assert_eq!(v.as_str(), s);
        }
    }

    #[test]
    fn parse_rejects_junk() {
        for s in ["", "v1.0.0", "1.0.0-beta", "1..0", ".1", "1.", "README.md", ".git", "a.b"] {
            assert!(SchemaVersion::parse(s).is_err(), "{s} should be rejected");
        }
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let v9 = SchemaVersion::parse("1.9.0").unwrap();
        let v10 = SchemaVersion::parse("1.10.0").unwrap();
        let v11 = SchemaVersion::parse("1.11.0").unwrap();
        assert!(v9 < v10);
        assert!(v10 < v11);
        assert!(v9 < v11);
    }

    #[test]
    fn shorter_prefix_orders_first() {
        let short = SchemaVersion::parse("1.0").unwrap();
        let long = SchemaVersion::parse("1.0.0").unwrap();
        assert!(short < long);
    }

    #[test]
    fn safe_name_replaces_dots() {
        let v = SchemaVersion::parse("1.10.0").unwrap();
        assert_eq!(v.safe_name(), "1_10_0");
    }

    #[test]
    fn display_round_trips() {
        let v = SchemaVersion::parse("2.0.0").unwrap();
        let parsed: SchemaVersion = v.to_string().parse().unwrap();
        assert_eq!(v, parsed);
    }

    #[test]
    fn serde_as_string() {
        let v = SchemaVersion::parse("1.2.3").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: SchemaVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    proptest! {
        #[test]
        fn ordering_matches_segment_tuples(a in proptest::collection::vec(0u64..1000, 1..5),
                                           b in proptest::collection::vec(0u64..1000, 1..5)) {
            let sa = a.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
            let sb = b.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
            let va = SchemaVersion::parse(&sa).unwrap();
            let vb = SchemaVersion::parse(&sb).unwrap();
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}
