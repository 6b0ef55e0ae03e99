//! Frost annotation discovery
//!
//! Structural (tree-sitter) scanning of Rust source roots for schema
//! version and migration plan declarations.
//!
//! # Example
//!
//! ```rust,ignore
//! let result = frost_discovery::scan_roots(&[project_root])?;
//! let decl = result.require_version(&version)?;
//! ```

#![warn(unreachable_pub)]

mod error;
mod scanner;

pub use error::DiscoveryError;
pub use scanner::{scan_roots, DiscoveryResult};
