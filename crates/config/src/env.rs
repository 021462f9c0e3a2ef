//! Environment variable parsing and env-to-options merging.
//!
//! Env parsing is strict: a variable that is present but empty or
//! unparsable fails fast instead of being ignored.

use crate::options::{ColorChoice, Destination, Format, Options};
use grovelog_domain::Level;
use grovelog_shared::{ErrorCode, LogError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Env var: minimum level.
pub const ENV_LEVEL: &str = "GROVELOG_LEVEL";
/// Env var: output format (`structured`/`json`, `plain`/`text`, `rich`/`color`).
pub const ENV_FORMAT: &str = "GROVELOG_FORMAT";
/// Env var: chrono strftime string for the rich renderer.
pub const ENV_TIME_FORMAT: &str = "GROVELOG_TIME_FORMAT";
/// Env var: color policy (`auto` / `never`).
pub const ENV_COLOR: &str = "GROVELOG_COLOR";
/// Env var: include call sites (boolean).
pub const ENV_ADD_SOURCE: &str = "GROVELOG_ADD_SOURCE";
/// Env var: append log lines to this file.
pub const ENV_FILE: &str = "GROVELOG_FILE";

const ENV_VARS: [&str; 6] = [
    ENV_LEVEL,
    ENV_FORMAT,
    ENV_TIME_FORMAT,
    ENV_COLOR,
    ENV_ADD_SOURCE,
    ENV_FILE,
];

/// Parsed environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEnv {
    /// `GROVELOG_LEVEL`.
    pub level: Option<Level>,
    /// `GROVELOG_FORMAT`.
    pub format: Option<Format>,
    /// `GROVELOG_TIME_FORMAT`.
    pub time_format: Option<String>,
    /// `GROVELOG_COLOR`.
    pub color: Option<ColorChoice>,
    /// `GROVELOG_ADD_SOURCE`.
    pub add_source: Option<bool>,
    /// `GROVELOG_FILE`.
    pub file: Option<PathBuf>,
}

impl LogEnv {
    /// Parse overrides from an explicit variable map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            level: parse_optional_enum(map, ENV_LEVEL)?,
            format: parse_optional_enum(map, ENV_FORMAT)?,
            time_format: parse_optional_trimmed_string(map, ENV_TIME_FORMAT)?,
            color: parse_optional_color(map, ENV_COLOR)?,
            add_source: parse_optional_bool(map, ENV_ADD_SOURCE)?,
            file: parse_optional_trimmed_string(map, ENV_FILE)?.map(PathBuf::from),
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no variable was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Apply env overrides on top of `options` and validate the result.
pub fn apply_env_overrides(mut options: Options, env: &LogEnv) -> Result<Options, LogError> {
    if let Some(level) = env.level {
        options.level = level;
    }
    if let Some(format) = env.format {
        options.format = format;
    }
    if let Some(time_format) = &env.time_format {
        options.time_format.clone_from(time_format);
    }
    if let Some(color) = env.color {
        options.color = color;
    }
    if let Some(add_source) = env.add_source {
        options.add_source = add_source;
    }
    if let Some(file) = &env.file {
        options.destination = Destination::File(file.clone());
    }

    options.validate()?;
    Ok(options)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    #[error("{var} must be non-empty")]
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    #[error("{var} must be a boolean")]
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    #[error("{var} has an unsupported value")]
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    /// Name of the offending variable.
    #[must_use]
    pub const fn var(&self) -> &'static str {
        match self {
            Self::EmptyValue { var }
            | Self::InvalidBool { var, .. }
            | Self::InvalidEnum { var, .. } => var,
        }
    }
}

impl From<EnvParseError> for LogError {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::config(ErrorCode::invalid_env(), error.to_string())
            .with_metadata("env_var", error.var());

        match error {
            EnvParseError::EmptyValue { .. } => envelope,
            EnvParseError::InvalidBool { value, .. } | EnvParseError::InvalidEnum { value, .. } => {
                envelope.with_metadata("value", value)
            },
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned()))
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError>
where
    T: std::str::FromStr,
{
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    raw.parse().map(Some).map_err(|_| EnvParseError::InvalidEnum {
        var,
        value: raw.clone(),
    })
}

fn parse_optional_color(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<ColorChoice>, EnvParseError> {
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    // Booleans are accepted too: `GROVELOG_COLOR=0` turns color off.
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(ColorChoice::Auto)),
        "false" | "0" | "no" => Ok(Some(ColorChoice::Never)),
        _ => raw
            .parse()
            .map(Some)
            .map_err(|_| EnvParseError::InvalidEnum { var, value: raw }),
    }
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_yields_no_overrides() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn values_are_trimmed_and_parsed() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&env_map(&[
            (ENV_LEVEL, " debug "),
            (ENV_FORMAT, "TEXT"),
            (ENV_ADD_SOURCE, "yes"),
            (ENV_COLOR, "0"),
            (ENV_FILE, "/tmp/app.log"),
        ]))?;

        assert_eq!(env.level, Some(Level::DEBUG));
        assert_eq!(env.format, Some(Format::Plain));
        assert_eq!(env.add_source, Some(true));
        assert_eq!(env.color, Some(ColorChoice::Never));
        assert_eq!(env.file, Some(PathBuf::from("/tmp/app.log")));
        Ok(())
    }

    #[test]
    fn empty_values_fail_fast() {
        let error = LogEnv::from_map(&env_map(&[(ENV_LEVEL, "   ")])).err();
        assert_eq!(error, Some(EnvParseError::EmptyValue { var: ENV_LEVEL }));
    }

    #[test]
    fn invalid_values_map_to_config_errors() -> Result<(), Box<dyn Error>> {
        let Err(error) = LogEnv::from_map(&env_map(&[(ENV_ADD_SOURCE, "maybe")])) else {
            return Err("expected an invalid bool".into());
        };
        let envelope = LogError::from(error);
        assert!(envelope.is_config());
        assert_eq!(envelope.code, ErrorCode::invalid_env());
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_ADD_SOURCE)
        );
        assert_eq!(envelope.metadata.get("value").map(String::as_str), Some("maybe"));
        Ok(())
    }

    #[test]
    fn unknown_format_is_an_enum_error() {
        let error = LogEnv::from_map(&env_map(&[(ENV_FORMAT, "xml")])).err();
        assert_eq!(
            error,
            Some(EnvParseError::InvalidEnum {
                var: ENV_FORMAT,
                value: "xml".to_string(),
            })
        );
    }

    #[test]
    fn overrides_apply_and_validate() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&env_map(&[(ENV_LEVEL, "error"), (ENV_FORMAT, "rich")]))?;
        let options = apply_env_overrides(Options::production(), &env)?;
        assert_eq!(options.level, Level::ERROR);
        assert_eq!(options.format, Format::Rich);

        let env = LogEnv::from_map(&env_map(&[(ENV_TIME_FORMAT, "%Q")]))?;
        let error = apply_env_overrides(Options::production(), &env).err();
        assert!(matches!(
            error,
            Some(ref error) if error.code == ErrorCode::invalid_time_format()
        ));
        Ok(())
    }
}
