//! Options loading helpers (defaults + file + env).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as `LogError`s of kind `Config`.

use crate::env::{LogEnv, apply_env_overrides};
use crate::options::Options;
use crate::schema::{LoggerConfig, parse_logger_config_json, parse_logger_config_toml};
use grovelog_shared::{ErrorCode, LogError};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load options from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`LogEnv`)
/// - config JSON (file content)
/// - defaults (`Options::default()`)
pub fn load_options_from_sources(
    config_json: Option<&str>,
    env: &LogEnv,
) -> Result<Options, LogError> {
    let config = match config_json {
        None => LoggerConfig::default(),
        Some(input) => parse_logger_config_json(input)?,
    };

    // env is applied last and also validates the resulting options.
    apply_env_overrides(config.apply_to(Options::default()), env)
}

/// Load options from an optional JSON or TOML file.
pub fn load_options_from_path(
    config_path: Option<&Path>,
    env: &LogEnv,
) -> Result<Options, LogError> {
    let config = match config_path {
        None => LoggerConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            tracing::debug!(path = %path.display(), ?format, "loaded logger config file");
            match format {
                ConfigFormat::Json => parse_logger_config_json(&config_text)?,
                ConfigFormat::Toml => parse_logger_config_toml(&config_text)?,
            }
        },
    };

    apply_env_overrides(config.apply_to(Options::default()), env)
}

/// Load options from the process environment and an optional file path.
pub fn load_options_std_env(config_path: Option<&Path>) -> Result<Options, LogError> {
    let env = LogEnv::from_std_env().map_err(LogError::from)?;
    load_options_from_path(config_path, &env)
}

fn read_config_file(path: &Path) -> Result<String, LogError> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        LogError::config(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
            .with_source(error)
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, LogError> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(LogError::config(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
