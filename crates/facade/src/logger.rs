//! The `Logger` front end.

use crate::handlers::{destination_handler, file_handler, new_handler};
use grovelog_adapters::MultiHandler;
use grovelog_config::Options;
use grovelog_domain::{Attr, Level, LogContext, Record, Source};
use grovelog_ports::{Handler, LogSink};
use grovelog_shared::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Cheaply clonable handle over a handler tree.
///
/// `with` and `with_group` return new loggers and never change the receiver.
/// The level methods (`info`, `warn`, ...) discard handler errors like any
/// logging call; [`Logger::try_log`] surfaces them.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    /// Logger writing to `options.destination`.
    pub fn new(options: Options) -> Result<Self> {
        Ok(Self::from_handler(destination_handler(options)?))
    }

    /// Logger writing to `sink`.
    pub fn with_sink(sink: Arc<dyn LogSink>, options: Options) -> Result<Self> {
        Ok(Self::from_handler(new_handler(sink, options)?))
    }

    /// Logger over an existing handler.
    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Debug level, rich output with call sites, on stdout.
    #[must_use]
    pub fn development() -> Self {
        Self::preset(Options::development())
    }

    /// Info level, structured output, on stdout.
    #[must_use]
    pub fn production() -> Self {
        Self::preset(Options::production())
    }

    /// Logger writing to both `options.destination` and the file at `path`.
    ///
    /// The file gets structured output when `options` ask for rich.
    pub fn with_file(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let console = destination_handler(options.clone())?;
        let file = file_handler(path, options)?;
        Ok(Self::from_handler(Arc::new(MultiHandler::new([console, file]))))
    }

    // Presets always validate; an empty fan-out only stands in for an
    // impossible failure.
    fn preset(options: Options) -> Self {
        Self::new(options)
            .unwrap_or_else(|_| Self::from_handler(Arc::new(MultiHandler::default())))
    }

    /// Underlying handler.
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Logger that adds `attrs` to every record.
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::from_handler(Arc::clone(&self.handler).with_attrs(attrs.into_iter().collect()))
    }

    /// Logger that nests later attributes under `name`.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self::from_handler(Arc::clone(&self.handler).with_group(name))
    }

    /// Would a record at `level` be emitted?
    pub fn enabled(&self, ctx: &LogContext, level: Level) -> bool {
        self.handler.enabled(ctx, level)
    }

    /// Emit a record, surfacing handler errors.
    ///
    /// Records below the handler's level are skipped without being built.
    #[track_caller]
    pub fn try_log(
        &self,
        ctx: &LogContext,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<()> {
        if !self.enabled(ctx, level) {
            return Ok(());
        }
        let record = Record::new(level, message)
            .with_attrs(attrs)
            .with_source(Source::caller());
        self.handler.handle(ctx, &record)
    }

    /// Emit a record; handler errors are dropped.
    #[track_caller]
    pub fn log(
        &self,
        ctx: &LogContext,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        let _ = self.try_log(ctx, level, message, attrs);
    }

    /// Log at debug level.
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log(&LogContext::new(), Level::DEBUG, message, attrs);
    }

    /// Log at info level.
    #[track_caller]
    pub fn info(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log(&LogContext::new(), Level::INFO, message, attrs);
    }

    /// Log at warn level.
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log(&LogContext::new(), Level::WARN, message, attrs);
    }

    /// Log at error level.
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log(&LogContext::new(), Level::ERROR, message, attrs);
    }

    /// Log at debug level with ambient context.
    #[track_caller]
    pub fn debug_ctx(
        &self,
        ctx: &LogContext,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.log(ctx, Level::DEBUG, message, attrs);
    }

    /// Log at info level with ambient context.
    #[track_caller]
    pub fn info_ctx(
        &self,
        ctx: &LogContext,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.log(ctx, Level::INFO, message, attrs);
    }

    /// Log at warn level with ambient context.
    #[track_caller]
    pub fn warn_ctx(
        &self,
        ctx: &LogContext,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.log(ctx, Level::WARN, message, attrs);
    }

    /// Log at error level with ambient context.
    #[track_caller]
    pub fn error_ctx(
        &self,
        ctx: &LogContext,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.log(ctx, Level::ERROR, message, attrs);
    }

    /// Flush every sink under this logger.
    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::production()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Logger").finish_non_exhaustive()
    }
}
