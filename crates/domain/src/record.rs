//! One immutable snapshot per log call.

use crate::level::Level;
use crate::value::Attr;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Call site that produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source file path as reported by the compiler.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl Source {
    /// Create a source location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of the caller (through any chain of `#[track_caller]` frames).
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for Source {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.file, self.line)
    }
}

/// A log record as handed to a handler.
///
/// Records are consumed by reference; handlers never retain them past the
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Time the record was created.
    pub time: DateTime<Local>,
    /// Severity.
    pub level: Level,
    /// Log message.
    pub message: String,
    /// Per-call attributes, in call order.
    pub attrs: Vec<Attr>,
    /// Call site, when captured.
    pub source: Option<Source>,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::at(Local::now(), level, message)
    }

    /// Create a record with an explicit timestamp.
    pub fn at(time: DateTime<Local>, level: Level, message: impl Into<String>) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            attrs: Vec::new(),
            source: None,
        }
    }

    /// Append attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Append a single attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }

    /// Attach the call site.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }
}
