//! # grovelog
//!
//! Structured logging front end: a cheap `Logger` handle over an immutable
//! tree of handlers that render JSON lines, `key=value` lines, or colorized
//! lines with a pretty-printed field blob.
//! This crate depends on `adapters`, `config`, `domain`, `ports`, and `shared`.
//!
//! ```no_run
//! use grovelog::{Logger, kv};
//!
//! let logger = Logger::development().with_group("http");
//! logger.info("request served", [kv("status", 200), kv("path", "/health")]);
//! ```

pub mod handlers;
pub mod helpers;
pub mod logger;

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use handlers::{destination_handler, file_handler, new_handler, open_destination};
pub use helpers::{CALLER_KEY, ERROR_KEY, caller, err, err_opt, kv};
pub use logger::Logger;

pub use grovelog_adapters::{
    DiscardSink, FileSink, FormatHandler, MultiHandler, StderrSink, StdoutSink, WriterSink,
};
pub use grovelog_config::{
    ColorChoice, DEFAULT_TIME_FORMAT, Destination, Format, LogEnv, Options, load_options_from_path,
    load_options_from_sources, load_options_std_env,
};
pub use grovelog_domain::{
    Attr, BoxError, ContextualError, Level, LogContext, Record, Source, Value, error_ctx, wrap_ctx,
};
pub use grovelog_ports::{Handler, LogSink};
pub use grovelog_shared::{ErrorCode, ErrorKind, LogError, Result};
