//! Byte sinks for rendered log lines.

use grovelog_ports::LogSink;
use grovelog_shared::{ErrorCode, LogError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sink over any writer, one exclusive lock per line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

/// Log sink that writes to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &[u8]) -> Result<()> {
        io::stdout().lock().write_all(line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stdout().lock().flush()?;
        Ok(())
    }
}

/// Log sink that writes to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &[u8]) -> Result<()> {
        io::stderr().lock().write_all(line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stderr().lock().flush()?;
        Ok(())
    }
}

/// Append-only file sink.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    inner: WriterSink<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Failure to open is a configuration error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|error| {
                LogError::config(
                    ErrorCode::open_file(),
                    format!("failed to open log file: {error}"),
                )
                .with_metadata("path", path.to_string_lossy().to_string())
                .with_source(error)
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: WriterSink::new(file),
        })
    }

    /// Path the sink appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &[u8]) -> Result<()> {
        self.inner.write_line(line)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn write_line(&self, _line: &[u8]) -> Result<()> {
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
