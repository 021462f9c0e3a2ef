//! Fixture loading for config and env tests.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fmt, fs};

/// Errors raised while loading fixtures.
#[derive(Debug)]
pub enum FixtureError {
    /// Fixture file does not exist.
    MissingFixture {
        /// Path that could not be found.
        path: PathBuf,
    },
    /// Fixture file could not be read.
    FixtureRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Fixture file could not be parsed.
    FixtureParse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFixture { path } => {
                write!(formatter, "missing fixture: {}", path.display())
            },
            Self::FixtureRead { path, source } => {
                write!(
                    formatter,
                    "failed to read fixture {}: {}",
                    path.display(),
                    source
                )
            },
            Self::FixtureParse { path, source } => {
                write!(
                    formatter,
                    "failed to parse fixture {}: {}",
                    path.display(),
                    source
                )
            },
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FixtureRead { source, .. } => Some(source),
            Self::FixtureParse { source, .. } => Some(source),
            Self::MissingFixture { .. } => None,
        }
    }
}

/// Directory holding the shared fixtures.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Absolute path of a fixture, relative to [`fixture_root`].
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixture_root().join(relative_path)
}

/// Read a fixture as text.
pub fn read_fixture(relative_path: &str) -> Result<String, FixtureError> {
    let path = fixture_path(relative_path);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(FixtureError::MissingFixture { path })
        },
        Err(error) => Err(FixtureError::FixtureRead {
            path,
            source: error,
        }),
    }
}

/// Read and parse a JSON fixture.
pub fn load_json_fixture<T: DeserializeOwned>(relative_path: &str) -> Result<T, FixtureError> {
    let contents = read_fixture(relative_path)?;
    serde_json::from_str(&contents).map_err(|error| FixtureError::FixtureParse {
        path: fixture_path(relative_path),
        source: error,
    })
}

/// Load an environment map fixture (`GROVELOG_*` name to value).
pub fn env_fixture(relative_path: &str) -> Result<BTreeMap<String, String>, FixtureError> {
    load_json_fixture(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fixture_errors_are_reported() {
        let result = read_fixture("config/missing.json");
        assert!(matches!(result, Err(FixtureError::MissingFixture { .. })));
    }

    #[test]
    fn env_fixtures_use_grovelog_names() -> Result<(), Box<dyn std::error::Error>> {
        for name in ["env/grovelog-env.valid.json", "env/grovelog-env.invalid.json"] {
            let env = env_fixture(name)?;
            assert!(!env.is_empty());
            assert!(env.keys().all(|key| key.starts_with("GROVELOG_")));
        }
        Ok(())
    }

    #[test]
    fn unparsable_fixture_is_a_parse_error() {
        let result: Result<BTreeMap<String, String>, FixtureError> =
            load_json_fixture("config/grovelog.development.toml");
        assert!(matches!(result, Err(FixtureError::FixtureParse { .. })));
    }
}
