//! Error envelope types and helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::{fmt, io};

/// Metadata attached to errors for diagnostics.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Boxed error payload kept as the `source()` of an envelope.
type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// High-level classification of where a logging failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A value could not be serialized into the configured encoding.
    Encoding,
    /// Writing to (or flushing) the destination failed.
    Sink,
    /// Invalid configuration detected while building a handler.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => formatter.write_str("encoding"),
            Self::Sink => formatter.write_str("sink"),
            Self::Config => formatter.write_str("config"),
        }
    }
}

/// Stable error code with namespace and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Create a new error code with a namespace and code.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// A value has no representation in the target encoding (e.g. `NaN`).
    pub fn unsupported_value() -> Self {
        Self::new("encode", "unsupported_value")
    }

    /// The serializer itself failed.
    pub fn serialize() -> Self {
        Self::new("encode", "serialize")
    }

    /// I/O failure while writing to a sink.
    pub fn io() -> Self {
        Self::new("sink", "io")
    }

    /// A log file could not be opened.
    pub fn open_file() -> Self {
        Self::new("config", "open_file")
    }

    /// The configured time format is not a valid strftime string.
    pub fn invalid_time_format() -> Self {
        Self::new("config", "invalid_time_format")
    }

    /// A level name could not be parsed.
    pub fn invalid_level() -> Self {
        Self::new("config", "invalid_level")
    }

    /// An output format name could not be parsed.
    pub fn invalid_format() -> Self {
        Self::new("config", "invalid_format")
    }

    /// A JSON configuration document is malformed.
    pub fn invalid_json() -> Self {
        Self::new("config", "invalid_json")
    }

    /// A TOML configuration document is malformed.
    pub fn invalid_toml() -> Self {
        Self::new("config", "invalid_toml")
    }

    /// An environment variable holds an unusable value.
    pub fn invalid_env() -> Self {
        Self::new("config", "invalid_env")
    }

    /// Returns the namespace portion.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the code identifier.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error envelope shared across crates.
///
/// Handlers return it unchanged to the caller: it is never retried and never
/// logged by the library itself.
#[derive(Debug)]
pub struct LogError {
    /// Where the failure happened.
    pub kind: ErrorKind,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Additional diagnostic metadata.
    pub metadata: ErrorMetadata,
    source: Option<BoxedSource>,
}

impl LogError {
    fn with_kind(kind: ErrorKind, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
            source: None,
        }
    }

    /// Create an encoding error.
    pub fn encoding(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Encoding, code, message)
    }

    /// Create a sink (write/flush) error.
    pub fn sink(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Sink, code, message)
    }

    /// Create a configuration error.
    pub fn config(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Config, code, message)
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns true for encoding failures.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        self.kind == ErrorKind::Encoding
    }

    /// Returns true for sink failures.
    #[must_use]
    pub fn is_sink(&self) -> bool {
        self.kind == ErrorKind::Sink
    }

    /// Returns true for configuration failures.
    #[must_use]
    pub fn is_config(&self) -> bool {
        self.kind == ErrorKind::Config
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}: {}", self.kind, self.code, self.message)
    }
}

impl StdError for LogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.source {
            Some(source) => Some(&**source),
            None => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(error: io::Error) -> Self {
        Self::sink(ErrorCode::io(), error.to_string())
            .with_metadata("io_kind", error.kind().to_string())
            .with_source(error)
    }
}
