//! Severity levels.

use grovelog_shared::{ErrorCode, LogError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered integer severity.
///
/// The four named levels are spaced four apart so custom levels can sit
/// between them (`Level::new(2)` renders as `INFO+2`). Any `i32` is a valid
/// level; comparisons are plain integer comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Level(i32);

impl Level {
    /// Diagnostic detail.
    pub const DEBUG: Self = Self(-4);
    /// Normal operation.
    pub const INFO: Self = Self(0);
    /// Suspicious condition.
    pub const WARN: Self = Self(4);
    /// Failure.
    pub const ERROR: Self = Self(8);

    /// Construct a level from its raw severity.
    #[must_use]
    pub const fn new(severity: i32) -> Self {
        Self(severity)
    }

    /// Returns the raw severity.
    #[must_use]
    pub const fn severity(self) -> i32 {
        self.0
    }

    /// Named level this one is rendered relative to, plus its name.
    const fn anchor(self) -> (Self, &'static str) {
        if self.0 < Self::INFO.0 {
            (Self::DEBUG, "DEBUG")
        } else if self.0 < Self::WARN.0 {
            (Self::INFO, "INFO")
        } else if self.0 < Self::ERROR.0 {
            (Self::WARN, "WARN")
        } else {
            (Self::ERROR, "ERROR")
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (anchor, name) = self.anchor();
        let offset = self.0 - anchor.0;
        if offset == 0 {
            formatter.write_str(name)
        } else {
            write!(formatter, "{name}{offset:+}")
        }
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Parses `NAME`, `NAME+N` or `NAME-N` (case-insensitive).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let split_at = trimmed.find(['+', '-']).unwrap_or(trimmed.len());
        let (name, offset) = trimmed.split_at(split_at);

        let base = match name.to_ascii_uppercase().as_str() {
            "DEBUG" => Self::DEBUG,
            "INFO" => Self::INFO,
            "WARN" => Self::WARN,
            "ERROR" => Self::ERROR,
            _ => return Err(invalid_level(input)),
        };

        if offset.is_empty() {
            return Ok(base);
        }

        offset
            .parse::<i32>()
            .ok()
            .and_then(|offset| base.0.checked_add(offset))
            .map(Self)
            .ok_or_else(|| invalid_level(input))
    }
}

fn invalid_level(input: &str) -> LogError {
    LogError::config(
        ErrorCode::invalid_level(),
        format!("unknown level `{input}`"),
    )
    .with_metadata("value", input)
}

impl TryFrom<String> for Level {
    type Error = LogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn named_levels_render_their_names() {
        assert_eq!(Level::DEBUG.to_string(), "DEBUG");
        assert_eq!(Level::INFO.to_string(), "INFO");
        assert_eq!(Level::WARN.to_string(), "WARN");
        assert_eq!(Level::ERROR.to_string(), "ERROR");
    }

    #[test]
    fn custom_levels_render_relative_to_anchor() {
        assert_eq!(Level::new(2).to_string(), "INFO+2");
        assert_eq!(Level::new(-6).to_string(), "DEBUG-2");
        assert_eq!(Level::new(12).to_string(), "ERROR+4");
        assert_eq!(Level::new(5).to_string(), "WARN+1");
    }

    #[test]
    fn parse_accepts_case_insensitive_names_and_offsets() -> Result<(), LogError> {
        assert_eq!("info".parse::<Level>()?, Level::INFO);
        assert_eq!(" Warn ".parse::<Level>()?, Level::WARN);
        assert_eq!("INFO+2".parse::<Level>()?, Level::new(2));
        assert_eq!("debug-2".parse::<Level>()?, Level::new(-6));
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let error = "loud".parse::<Level>().err();
        assert!(matches!(error, Some(ref error) if error.is_config()));
        assert!("INFO+x".parse::<Level>().is_err());
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::new(2));
        assert!(Level::new(2) < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
    }

    proptest! {
        #[test]
        fn rendered_levels_parse_back(severity in -64i32..64) {
            let level = Level::new(severity);
            let parsed = level.to_string().parse::<Level>();
            prop_assert!(matches!(parsed, Ok(value) if value == level));
        }
    }
}
