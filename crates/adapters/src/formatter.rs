//! Rich line composition.

use crate::colorize::Palette;
use chrono::{DateTime, TimeZone};
use grovelog_config::validate_time_format;
use grovelog_domain::Level;
use grovelog_shared::{ErrorCode, LogError, Result};
use std::fmt::Display;
use std::io::Write;

/// Composes `<time> <LEVEL:> <message>[ <fields>]` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormatter {
    time_format: String,
    palette: Palette,
}

impl RecordFormatter {
    /// Build a formatter; fails when `time_format` is not valid strftime.
    pub fn new(time_format: impl Into<String>, palette: Palette) -> Result<Self> {
        let time_format = time_format.into();
        validate_time_format(&time_format)?;
        Ok(Self {
            time_format,
            palette,
        })
    }

    /// Configured time format.
    #[must_use]
    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Append one newline-terminated line to `line`.
    ///
    /// `fields` is the encoded field blob; when empty the fields segment is
    /// omitted entirely.
    pub fn format_into<Tz>(
        &self,
        line: &mut Vec<u8>,
        time: &DateTime<Tz>,
        level: Level,
        message: &str,
        fields: &[u8],
    ) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let level_token = format!("{level}:");
        write!(
            line,
            "{} {} {}",
            time.format(&self.time_format),
            self.palette.level(level, &level_token),
            self.palette.message(message),
        )
        .map_err(format_error)?;

        if !fields.is_empty() {
            line.push(b' ');
            let blob = String::from_utf8_lossy(fields);
            line.extend_from_slice(self.palette.fields(&blob).as_bytes());
        }
        line.push(b'\n');
        Ok(())
    }

    /// Format one line into a fresh buffer.
    pub fn format<Tz>(
        &self,
        time: &DateTime<Tz>,
        level: Level,
        message: &str,
        fields: &[u8],
    ) -> Result<Vec<u8>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut line = Vec::new();
        self.format_into(&mut line, time, level, message, fields)?;
        Ok(line)
    }
}

fn format_error(error: std::io::Error) -> LogError {
    LogError::encoding(ErrorCode::serialize(), format!("failed to format line: {error}"))
        .with_source(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use grovelog_config::DEFAULT_TIME_FORMAT;
    use std::error::Error;

    fn fixed_time() -> Result<DateTime<FixedOffset>, Box<dyn Error>> {
        let offset = FixedOffset::east_opt(0).ok_or("offset")?;
        let naive = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_milli_opt(14, 5, 7, 42))
            .ok_or("date")?;
        Ok(naive.and_local_timezone(offset).single().ok_or("time")?)
    }

    #[test]
    fn line_without_fields_has_no_trailing_blob() -> Result<(), Box<dyn Error>> {
        let formatter = RecordFormatter::new(DEFAULT_TIME_FORMAT, Palette::plain())?;
        let line = formatter.format(&fixed_time()?, Level::INFO, "hello", b"")?;
        assert_eq!(String::from_utf8(line)?, "[14:05:07.042] INFO: hello\n");
        Ok(())
    }

    #[test]
    fn fields_follow_the_message() -> Result<(), Box<dyn Error>> {
        let formatter = RecordFormatter::new("%H:%M", Palette::plain())?;
        let line = formatter.format(&fixed_time()?, Level::new(6), "slow", b"{\"ms\": 900}")?;
        assert_eq!(String::from_utf8(line)?, "14:05 WARN+2: slow {\"ms\": 900}\n");
        Ok(())
    }

    #[test]
    fn invalid_time_format_is_rejected_up_front() {
        let error = RecordFormatter::new("%Q", Palette::plain()).err();
        assert!(matches!(error, Some(ref error) if error.is_config()));
    }
}
