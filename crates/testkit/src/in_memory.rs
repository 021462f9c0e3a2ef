//! In-memory handler and sink implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests
//! - Contract tests for the fan-out and derivation rules
//! - Local experimentation without touching stdout or files

use grovelog_ports::{Attr, Handler, Level, LogContext, LogSink, Record};
use grovelog_shared::{ErrorCode, LogError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A handler that accepts everything and writes nothing.
#[derive(Debug, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {
    fn enabled(&self, _ctx: &LogContext, _level: Level) -> bool {
        true
    }

    fn handle(&self, _ctx: &LogContext, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn with_attrs(self: Arc<Self>, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
        self
    }

    fn with_group(self: Arc<Self>, _name: &str) -> Arc<dyn Handler> {
        self
    }
}

/// One record as seen by a [`CapturingHandler`].
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    /// Record level.
    pub level: Level,
    /// Record message.
    pub message: String,
    /// Attributes accumulated on the handler.
    pub handler_attrs: Vec<Attr>,
    /// Group path of the handler.
    pub groups: Vec<String>,
    /// Ambient context attributes.
    pub ctx_attrs: Vec<Attr>,
    /// Attributes carried by the record itself.
    pub record_attrs: Vec<Attr>,
}

/// A handler that records every call into a journal shared with all
/// handlers derived from it.
#[derive(Debug, Clone)]
pub struct CapturingHandler {
    min_level: Level,
    attrs: Vec<Attr>,
    groups: Vec<String>,
    journal: Arc<Mutex<Vec<Captured>>>,
}

impl Default for CapturingHandler {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl CapturingHandler {
    /// Capture records at or above `min_level`.
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            attrs: Vec::new(),
            groups: Vec::new(),
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of everything captured so far.
    pub fn records(&self) -> Vec<Captured> {
        self.journal.lock().expect("capture journal lock").clone()
    }

    /// Number of captured records.
    pub fn len(&self) -> usize {
        self.journal.lock().expect("capture journal lock").len()
    }

    /// Returns true when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the journal.
    pub fn take(&self) -> Vec<Captured> {
        std::mem::take(&mut *self.journal.lock().expect("capture journal lock"))
    }
}

impl Handler for CapturingHandler {
    fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
        level >= self.min_level
    }

    fn handle(&self, ctx: &LogContext, record: &Record) -> Result<()> {
        let captured = Captured {
            level: record.level,
            message: record.message.clone(),
            handler_attrs: self.attrs.clone(),
            groups: self.groups.clone(),
            ctx_attrs: ctx.attrs(),
            record_attrs: record.attrs.clone(),
        };
        self.journal
            .lock()
            .expect("capture journal lock")
            .push(captured);
        Ok(())
    }

    fn with_attrs(self: Arc<Self>, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut derived = (*self).clone();
        derived.attrs.extend(attrs);
        Arc::new(derived)
    }

    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler> {
        let mut derived = (*self).clone();
        derived.groups.push(name.to_string());
        Arc::new(derived)
    }
}

/// A handler whose `handle` always fails.
#[derive(Debug)]
pub struct FailingHandler {
    make_error: fn() -> LogError,
    calls: AtomicUsize,
}

impl Default for FailingHandler {
    fn default() -> Self {
        Self::new(crate::errors::sink_error)
    }
}

impl FailingHandler {
    /// Fail every call with the error built by `make_error`.
    pub fn new(make_error: fn() -> LogError) -> Self {
        Self {
            make_error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `handle` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Handler for FailingHandler {
    fn enabled(&self, _ctx: &LogContext, _level: Level) -> bool {
        true
    }

    fn handle(&self, _ctx: &LogContext, _record: &Record) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }

    fn with_attrs(self: Arc<Self>, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
        self
    }

    fn with_group(self: Arc<Self>, _name: &str) -> Arc<dyn Handler> {
        self
    }
}

/// A sink that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<Vec<u8>>>,
    flushes: AtomicUsize,
}

impl MemorySink {
    /// Lines written so far, lossily decoded and without the trailing newline.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("memory sink lock")
            .iter()
            .map(|line| {
                String::from_utf8_lossy(line)
                    .trim_end_matches('\n')
                    .to_string()
            })
            .collect()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        let lines = self.lines();
        self.lines.lock().expect("memory sink lock").clear();
        lines
    }

    /// Raw bytes written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.lines.lock().expect("memory sink lock").concat()
    }

    /// Number of `flush` calls.
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &[u8]) -> Result<()> {
        self.lines
            .lock()
            .expect("memory sink lock")
            .push(line.to_vec());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A sink whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    /// Number of attempted writes.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl LogSink for FailingSink {
    fn write_line(&self, _line: &[u8]) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(LogError::sink(ErrorCode::io(), "sink closed"))
    }

    fn flush(&self) -> Result<()> {
        Err(LogError::sink(ErrorCode::io(), "sink closed"))
    }
}
