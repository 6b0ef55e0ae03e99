//! Frost core vocabulary
//!
//! Leaf types shared across the freeze pipeline:
//!
//! - [`SchemaVersion`]: numerically ordered version identifier
//! - [`VersionDeclaration`] / [`MigrationPlanDeclaration`]: discovered
//!   annotation records
//! - [`StructuralManifest`]: the structural export fingerprints are computed
//!   over
//! - [`Fingerprint`]: SHA-256 content fingerprint for drift detection

#![warn(unreachable_pub)]

mod declarations;
mod fingerprint;
mod manifest;
mod version;

pub use declarations::{MigrationPlanDeclaration, VersionDeclaration};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use manifest::{EntityRecord, ManifestError, StructuralManifest};
pub use version::{SchemaVersion, VersionError};
