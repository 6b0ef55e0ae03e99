//! Frost fixture store and drift engine
//!
//! The durable, versioned, content-addressed home of frozen schema
//! artifacts, plus the fingerprint comparison that detects drift.

#![warn(unreachable_pub)]

mod drift;
mod error;
mod store;

pub use drift::DriftResult;
pub use error::StoreError;
pub use store::{FixtureArtifactSet, FixtureArtifacts, FixtureFileNames, FixtureStore};
