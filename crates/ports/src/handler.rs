//! Handler boundary contract.

use grovelog_domain::{Attr, Level, LogContext, Record};
use grovelog_shared::Result;
use std::sync::Arc;

/// Formats and emits log records.
///
/// Handlers form an immutable derivation tree: `with_attrs` and `with_group`
/// never change the receiver; they return a new handler that shares the
/// receiver's sink and configuration. A derivation that changes nothing
/// (only empty keys, or an empty group name) returns the receiver itself.
///
/// Every method may be called concurrently from any number of threads.
pub trait Handler: Send + Sync {
    /// Cheap pre-check: should a record at `level` be built at all?
    fn enabled(&self, ctx: &LogContext, level: Level) -> bool;

    /// Format and write one record.
    ///
    /// `ctx` attributes are merged into the record's attributes. Encoding and
    /// sink failures are returned unchanged and never retried.
    fn handle(&self, ctx: &LogContext, record: &Record) -> Result<()>;

    /// Derive a handler that adds `attrs` to every record.
    fn with_attrs(self: Arc<Self>, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Derive a handler that nests every later attribute under `name`.
    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler>;

    /// Flush buffered output. Most handlers write through and have nothing to do.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
