//! Byte sink contract.

use grovelog_shared::Result;

/// Destination for rendered log lines.
///
/// Implementations must make each `write_line` call atomic with respect to
/// other callers: the bytes of one line never interleave with another's.
pub trait LogSink: Send + Sync {
    /// Write one complete, newline-terminated line.
    fn write_line(&self, line: &[u8]) -> Result<()>;

    /// Flush any buffered bytes.
    fn flush(&self) -> Result<()>;
}
