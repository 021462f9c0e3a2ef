//! Handler options, presets, and validation.

use chrono::format::{Item, StrftimeItems};
use grovelog_domain::Level;
use grovelog_shared::{ErrorCode, LogError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Time format used by the rich renderer when none is configured.
///
/// Renders as `[HH:MM:SS.mmm]`.
pub const DEFAULT_TIME_FORMAT: &str = "[%H:%M:%S%.3f]";

/// RFC 3339 with millisecond precision.
pub const RFC3339_MILLIS_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Wall-clock time with milliseconds.
pub const DEVELOPMENT_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Output encoding selected once at handler construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per line.
    #[default]
    #[serde(alias = "json")]
    Structured,
    /// `key=value` pairs.
    #[serde(alias = "text")]
    Plain,
    /// Human-readable colorized line with a pretty-printed field blob.
    #[serde(alias = "color", alias = "colour")]
    Rich,
}

impl Format {
    /// Canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Plain => "plain",
            Self::Rich => "rich",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(Self::Structured),
            "plain" | "text" => Ok(Self::Plain),
            "rich" | "color" | "colour" => Ok(Self::Rich),
            _ => Err(LogError::config(
                ErrorCode::invalid_format(),
                format!("unknown output format `{input}`"),
            )
            .with_metadata("value", input)),
        }
    }
}

/// Whether the rich renderer emits ANSI escapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Follow terminal detection (`NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE`).
    #[default]
    Auto,
    /// Never colorize.
    Never,
}

impl FromStr for ColorChoice {
    type Err = LogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "never" | "none" | "off" => Ok(Self::Never),
            _ => Err(LogError::config(
                ErrorCode::invalid_format(),
                format!("unknown color choice `{input}`"),
            )
            .with_metadata("value", input)),
        }
    }
}

/// Where the root handler writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// Append to a file, creating it if needed.
    File(PathBuf),
}

/// Immutable handler configuration.
///
/// Built once per root handler and shared (by `Arc`) with every derived
/// handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Minimum level that is emitted.
    pub level: Level,
    /// chrono strftime string for the rich renderer. Empty means
    /// [`DEFAULT_TIME_FORMAT`].
    pub time_format: String,
    /// Output encoding.
    pub format: Format,
    /// ANSI color policy for the rich renderer.
    pub color: ColorChoice,
    /// Include the call site when the record carries one.
    pub add_source: bool,
    /// Destination resolved by the facade.
    pub destination: Destination,
}

impl Options {
    /// Options with the given level, time format and encoding; everything
    /// else takes its default.
    pub fn new(level: Level, time_format: impl Into<String>, format: Format) -> Self {
        let time_format = time_format.into();
        let time_format = if time_format.is_empty() {
            DEFAULT_TIME_FORMAT.to_string()
        } else {
            time_format
        };
        Self {
            level,
            time_format,
            format,
            color: ColorChoice::Auto,
            add_source: false,
            destination: Destination::Stdout,
        }
    }

    /// Info level, RFC 3339 timestamps, structured output on stdout.
    #[must_use]
    pub fn production() -> Self {
        Self::new(Level::INFO, RFC3339_MILLIS_TIME_FORMAT, Format::Structured)
    }

    /// Debug level, wall-clock timestamps, rich output with call sites.
    #[must_use]
    pub fn development() -> Self {
        Self::new(Level::DEBUG, DEVELOPMENT_TIME_FORMAT, Format::Rich).with_add_source(true)
    }

    /// Time format with the empty-string default applied.
    #[must_use]
    pub fn resolved_time_format(&self) -> &str {
        if self.time_format.is_empty() {
            DEFAULT_TIME_FORMAT
        } else {
            &self.time_format
        }
    }

    /// Replace the minimum level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Replace the encoding.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Replace the time format (empty restores the default).
    #[must_use]
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    /// Replace the color policy.
    #[must_use]
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Toggle call-site capture.
    #[must_use]
    pub fn with_add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Replace the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Check the options before any handler is built from them.
    pub fn validate(&self) -> Result<(), LogError> {
        validate_time_format(self.resolved_time_format())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::production()
    }
}

/// Reject strftime strings chrono cannot render.
pub fn validate_time_format(time_format: &str) -> Result<(), LogError> {
    if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
        return Err(LogError::config(
            ErrorCode::invalid_time_format(),
            format!("invalid time format `{time_format}`"),
        )
        .with_metadata("time_format", time_format));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn empty_time_format_uses_default() {
        let options = Options::new(Level::INFO, "", Format::Rich);
        assert_eq!(options.time_format, DEFAULT_TIME_FORMAT);

        let cleared = options.with_time_format("");
        assert_eq!(cleared.resolved_time_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn presets_match_their_purpose() {
        let production = Options::production();
        assert_eq!(production.level, Level::INFO);
        assert_eq!(production.format, Format::Structured);
        assert!(!production.add_source);
        assert_eq!(Options::default(), production);

        let development = Options::development();
        assert_eq!(development.level, Level::DEBUG);
        assert_eq!(development.format, Format::Rich);
        assert!(development.add_source);
    }

    #[test]
    fn format_aliases_parse() -> Result<(), Box<dyn Error>> {
        assert_eq!("json".parse::<Format>()?, Format::Structured);
        assert_eq!("TEXT".parse::<Format>()?, Format::Plain);
        assert_eq!("colour".parse::<Format>()?, Format::Rich);
        assert_eq!(serde_json::from_str::<Format>(r#""color""#)?, Format::Rich);
        assert!("xml".parse::<Format>().is_err_and(|error| error.is_config()));
        Ok(())
    }

    #[test]
    fn color_choice_parses() -> Result<(), Box<dyn Error>> {
        assert_eq!("auto".parse::<ColorChoice>()?, ColorChoice::Auto);
        assert_eq!("never".parse::<ColorChoice>()?, ColorChoice::Never);
        assert!("sometimes".parse::<ColorChoice>().is_err());
        Ok(())
    }

    #[test]
    fn validate_rejects_bad_strftime() {
        let options = Options::production().with_time_format("%Q");
        let error = options.validate().err();
        assert!(matches!(
            error,
            Some(ref error) if error.code == ErrorCode::invalid_time_format()
        ));
        assert!(Options::development().validate().is_ok());
    }

    #[test]
    fn destination_serializes_externally_tagged() -> Result<(), Box<dyn Error>> {
        let stdout = serde_json::to_string(&Destination::Stdout)?;
        assert_eq!(stdout, r#""stdout""#);
        let file: Destination = serde_json::from_str(r#"{"file":"/tmp/app.log"}"#)?;
        assert_eq!(file, Destination::File(PathBuf::from("/tmp/app.log")));
        Ok(())
    }
}
