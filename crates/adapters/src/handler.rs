//! Formatting handler: structured, plain and rich renderers over one sink.

use crate::colorize::Palette;
use crate::encoder::{BufferPool, FieldEncoder, encode_error};
use crate::flatten::{FlatFields, flatten_into};
use crate::formatter::RecordFormatter;
use chrono::SecondsFormat;
use grovelog_config::{Format, Options};
use grovelog_ports::{Attr, Handler, Level, LogContext, LogSink, Record, Source, Value};
use grovelog_shared::Result;
use serde::ser::{SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// Key under which the call site is rendered.
pub const SOURCE_KEY: &str = "source";

/// Line renderer, picked once from [`Format`] at construction.
#[derive(Debug)]
pub enum Renderer {
    /// One JSON object per line.
    Structured,
    /// `key=value` pairs.
    Plain,
    /// Timestamp, colored level and message, pretty fields blob.
    Rich(RecordFormatter),
}

impl Renderer {
    /// Renderer for `options`; rich validates the time format.
    pub fn from_options(options: &Options) -> Result<Self> {
        Ok(match options.format {
            Format::Structured => Self::Structured,
            Format::Plain => Self::Plain,
            Format::Rich => Self::Rich(RecordFormatter::new(
                options.resolved_time_format(),
                Palette::new(options.color),
            )?),
        })
    }

    /// Encoding this renderer produces.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Structured => Format::Structured,
            Self::Plain => Format::Plain,
            Self::Rich(_) => Format::Rich,
        }
    }
}

/// State shared by every handler derived from one root.
struct Shared {
    options: Options,
    renderer: Renderer,
    sink: Arc<dyn LogSink>,
    pool: Arc<BufferPool>,
    encoder: FieldEncoder,
}

/// Handler that renders records in the configured format and writes one
/// line per record to its sink.
///
/// Derived handlers share the root's sink, options and buffer pool. Their own
/// attribute list and group path are immutable after construction.
#[derive(Clone)]
pub struct FormatHandler {
    shared: Arc<Shared>,
    attrs: Arc<[Attr]>,
    groups: Arc<[Box<str>]>,
}

impl FormatHandler {
    /// Root handler writing to `sink`.
    ///
    /// Fails with a configuration error when the options are invalid.
    pub fn new(sink: Arc<dyn LogSink>, options: Options) -> Result<Self> {
        options.validate()?;
        let renderer = Renderer::from_options(&options)?;
        let pool = Arc::new(BufferPool::new());
        let encoder = FieldEncoder::new(Arc::clone(&pool));
        Ok(Self {
            shared: Arc::new(Shared {
                options,
                renderer,
                sink,
                pool,
                encoder,
            }),
            attrs: Arc::from(Vec::new()),
            groups: Arc::from(Vec::new()),
        })
    }

    /// Options the root was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    /// Encoding in use.
    #[must_use]
    pub fn format(&self) -> Format {
        self.shared.renderer.format()
    }

    /// Accumulated handler attributes.
    #[must_use]
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Current group path.
    #[must_use]
    pub fn groups(&self) -> &[Box<str>] {
        &self.groups
    }

    /// Returns true when both handlers write through the same root state.
    #[must_use]
    pub fn shares_root_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Render `record` into `line` without writing it.
    pub fn render(&self, line: &mut Vec<u8>, ctx: &LogContext, record: &Record) -> Result<()> {
        let source = if self.shared.options.add_source {
            record.source.as_ref()
        } else {
            None
        };

        let mut fields = FlatFields::new();
        if let (Renderer::Rich(_), Some(source)) = (&self.shared.renderer, source) {
            fields.insert(SOURCE_KEY.to_string(), Value::from(source.to_string()));
        }
        let ctx_attrs = ctx.attrs();
        flatten_into(
            &mut fields,
            &self.groups,
            self.attrs.iter().chain(&ctx_attrs).chain(&record.attrs),
        );

        match &self.shared.renderer {
            Renderer::Structured => write_structured(line, record, source, &fields),
            Renderer::Plain => {
                write_plain(line, record, source, &fields);
                Ok(())
            },
            Renderer::Rich(formatter) => {
                let blob = if fields.is_empty() {
                    Vec::new()
                } else {
                    self.shared.encoder.encode(&fields)?
                };
                formatter.format_into(line, &record.time, record.level, &record.message, &blob)
            },
        }
    }

    fn derive(&self, attrs: Arc<[Attr]>, groups: Arc<[Box<str>]>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            attrs,
            groups,
        }
    }
}

impl fmt::Debug for FormatHandler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FormatHandler")
            .field("format", &self.format())
            .field("level", &self.shared.options.level)
            .field("attrs", &self.attrs.len())
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl Handler for FormatHandler {
    fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
        level >= self.shared.options.level
    }

    fn handle(&self, ctx: &LogContext, record: &Record) -> Result<()> {
        let mut line = self.shared.pool.acquire();
        self.render(&mut line, ctx, record)?;
        self.shared.sink.write_line(&line)
    }

    fn with_attrs(self: Arc<Self>, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut delta = attrs
            .into_iter()
            .filter(|attr| !attr.has_empty_key())
            .peekable();
        if delta.peek().is_none() {
            return self;
        }
        let attrs: Arc<[Attr]> = self.attrs.iter().cloned().chain(delta).collect();
        Arc::new(self.derive(attrs, Arc::clone(&self.groups)))
    }

    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler> {
        if name.is_empty() {
            return self;
        }
        let groups: Arc<[Box<str>]> = self
            .groups
            .iter()
            .cloned()
            .chain(std::iter::once(Box::from(name)))
            .collect();
        Arc::new(self.derive(Arc::clone(&self.attrs), groups))
    }

    fn flush(&self) -> Result<()> {
        self.shared.sink.flush()
    }
}

fn timestamp(record: &Record) -> String {
    record.time.to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn write_structured(
    line: &mut Vec<u8>,
    record: &Record,
    source: Option<&Source>,
    fields: &FlatFields,
) -> Result<()> {
    {
        let mut serializer = serde_json::Serializer::new(&mut *line);
        let mut map = serializer.serialize_map(None).map_err(encode_error)?;
        map.serialize_entry("time", &timestamp(record))
            .map_err(encode_error)?;
        map.serialize_entry("level", &record.level.to_string())
            .map_err(encode_error)?;
        map.serialize_entry("msg", &record.message)
            .map_err(encode_error)?;
        if let Some(source) = source {
            map.serialize_entry(SOURCE_KEY, source)
                .map_err(encode_error)?;
        }
        for (key, value) in fields.iter() {
            map.serialize_entry(key, value).map_err(encode_error)?;
        }
        map.end().map_err(encode_error)?;
    }
    line.push(b'\n');
    Ok(())
}

fn write_plain(
    line: &mut Vec<u8>,
    record: &Record,
    source: Option<&Source>,
    fields: &FlatFields,
) {
    push_pair(line, "time", &timestamp(record));
    line.push(b' ');
    push_pair(line, "level", &record.level.to_string());
    line.push(b' ');
    push_pair(line, "msg", &record.message);
    if let Some(source) = source {
        line.push(b' ');
        push_pair(line, SOURCE_KEY, &source.to_string());
    }
    for (key, value) in fields.iter() {
        line.push(b' ');
        push_pair(line, key, &value.to_string());
    }
    line.push(b'\n');
}

fn push_pair(line: &mut Vec<u8>, key: &str, value: &str) {
    push_text(line, key);
    line.push(b'=');
    push_text(line, value);
}

fn push_text(line: &mut Vec<u8>, text: &str) {
    if needs_quoting(text) {
        line.extend_from_slice(format!("{text:?}").as_bytes());
    } else {
        line.extend_from_slice(text.as_bytes());
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|ch| ch == ' ' || ch == '"' || ch == '=' || ch.is_control())
}
