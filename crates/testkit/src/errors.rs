//! Test fixtures for shared error codes.

use grovelog_shared::{ErrorCode, LogError};

/// Return the error codes the handlers can surface.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::unsupported_value(),
        ErrorCode::serialize(),
        ErrorCode::io(),
        ErrorCode::open_file(),
        ErrorCode::invalid_time_format(),
    ]
}

/// A failed write.
pub fn sink_error() -> LogError {
    LogError::sink(ErrorCode::io(), "sink closed")
}

/// A value that could not be encoded.
pub fn encoding_error() -> LogError {
    LogError::encoding(ErrorCode::unsupported_value(), "value is not encodable")
}

/// A log file that could not be opened.
pub fn config_error() -> LogError {
    LogError::config(ErrorCode::open_file(), "failed to open log file")
}
