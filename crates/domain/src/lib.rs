//! # grovelog-domain
//!
//! Data model for structured log records.
//!
//! This crate contains the values every other crate passes around:
//!
//! - **Level** - ordered integer severity with named anchors
//! - **Value / Attr** - dynamically-typed attribute values and key/value pairs
//! - **Record** - one immutable snapshot per log call
//! - **Context** - ambient attributes (`LogContext`) and errors that carry them
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No formatting, sink, or handler logic
//! - Pure data with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use grovelog_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod context;
pub mod level;
pub mod record;
pub mod value;

pub use context::{BoxError, ContextualError, LogContext, OP_KEY, error_ctx, wrap_ctx};
pub use level::Level;
pub use record::{Record, Source};
pub use value::{Attr, Value};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn domain_depends_on_shared() {
        let shared_version = shared_crate_version();
        assert!(!shared_version.is_empty());
    }
}
