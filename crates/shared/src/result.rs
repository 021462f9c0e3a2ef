//! Result alias for shared error handling.

use crate::errors::LogError;

/// Shared result type used across the workspace.
pub type Result<T, E = LogError> = std::result::Result<T, E>;
