//! # grovelog-ports
//!
//! Boundary traits for the grovelog hexagonal architecture.
//!
//! This crate defines the interfaces between the record model and the
//! formatting/output adapters. It depends only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod handler;
pub mod sink;

pub use handler::Handler;
pub use sink::LogSink;

// Re-export domain types used in port signatures, so adapter crates can
// implement ports without directly depending on `grovelog-domain`.
pub use grovelog_domain::{Attr, Level, LogContext, Record, Source, Value};
