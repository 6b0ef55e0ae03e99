//! Frost scaffolding engine
//!
//! Creates user-owned verification-test skeletons (drift checks and
//! migration-pair checks) exactly once per subject; existing files are
//! never touched.

#![warn(unreachable_pub)]

mod engine;
mod error;
mod templates;

pub use engine::{find_preceding_version, ScaffoldEngine, ScaffoldOutcome};
pub use error::ScaffoldError;
pub use templates::CUSTOMIZE_MARKER;
