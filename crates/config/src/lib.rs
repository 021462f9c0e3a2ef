//! # grovelog-config
//!
//! Handler options, presets, and deterministic loading from files and the
//! environment. This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Options loading helpers (env + file).
pub mod load;
/// Handler options and presets.
pub mod options;
/// Configuration file schema.
pub mod schema;

pub use env::{
    ENV_ADD_SOURCE, ENV_COLOR, ENV_FILE, ENV_FORMAT, ENV_LEVEL, ENV_TIME_FORMAT, EnvParseError,
    LogEnv, apply_env_overrides,
};
pub use load::{load_options_from_path, load_options_from_sources, load_options_std_env};
pub use options::{
    ColorChoice, DEFAULT_TIME_FORMAT, DEVELOPMENT_TIME_FORMAT, Destination, Format, Options,
    RFC3339_MILLIS_TIME_FORMAT, validate_time_format,
};
pub use schema::{LoggerConfig, Output, parse_logger_config_json, parse_logger_config_toml};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
