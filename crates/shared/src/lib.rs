//! # grovelog-shared
//!
//! Shared result types and error handling for the grovelog workspace.
//!
//! This crate provides foundational types that are used across all other crates:
//!
//! - The `LogError` envelope and its `ErrorKind` / `ErrorCode` classification
//! - The workspace-wide `Result` alias
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Stable codes** - Every failure carries a `namespace:code` identifier
//! 3. **Serde-compatible** - Classification types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod result;

pub use errors::{ErrorCode, ErrorKind, ErrorMetadata, LogError};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
