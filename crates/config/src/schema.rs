//! Logger configuration file schema.
//!
//! Every field is optional: a config file only states what it changes, and
//! the remaining values come from the base [`Options`].

use crate::options::{ColorChoice, Destination, Format, Options};
use grovelog_domain::Level;
use grovelog_shared::{ErrorCode, LogError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Console stream selected by a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Serde schema for JSON / TOML logger configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggerConfig {
    /// Minimum level (`"debug"`, `"INFO+2"`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Output encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// chrono strftime string for the rich renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// ANSI color policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
    /// Include call sites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_source: Option<bool>,
    /// Console stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,
    /// Log file path; takes precedence over `output`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LoggerConfig {
    /// Overlay the fields this config sets onto `options`.
    #[must_use]
    pub fn apply_to(self, mut options: Options) -> Options {
        if let Some(level) = self.level {
            options.level = level;
        }
        if let Some(format) = self.format {
            options.format = format;
        }
        if let Some(time_format) = self.time_format {
            options.time_format = time_format;
        }
        if let Some(color) = self.color {
            options.color = color;
        }
        if let Some(add_source) = self.add_source {
            options.add_source = add_source;
        }
        match (self.file, self.output) {
            (Some(path), _) => options.destination = Destination::File(path),
            (None, Some(Output::Stdout)) => options.destination = Destination::Stdout,
            (None, Some(Output::Stderr)) => options.destination = Destination::Stderr,
            (None, None) => {},
        }
        options
    }
}

/// Parse a logger config from a JSON string.
pub fn parse_logger_config_json(input: &str) -> Result<LoggerConfig, LogError> {
    serde_json::from_str(input).map_err(|error| {
        LogError::config(
            ErrorCode::invalid_json(),
            format!("invalid config JSON: {error}"),
        )
        .with_metadata("source", "config")
    })
}

/// Parse a logger config from a TOML string.
pub fn parse_logger_config_toml(input: &str) -> Result<LoggerConfig, LogError> {
    toml::from_str(input).map_err(|error| {
        LogError::config(
            ErrorCode::invalid_toml(),
            format!("invalid config TOML: {error}"),
        )
        .with_metadata("source", "config")
    })
}
