//! Attribute helpers for call sites.

use grovelog_domain::{Attr, Source, Value};
use std::fmt::Display;

/// Key used by [`err`].
pub const ERROR_KEY: &str = "error";

/// Key used by [`caller`].
pub const CALLER_KEY: &str = "caller";

/// Key/value attribute.
pub fn kv(key: impl Into<String>, value: impl Into<Value>) -> Attr {
    Attr::new(key, value)
}

/// `error` attribute holding the error's message.
pub fn err(error: &(impl Display + ?Sized)) -> Attr {
    Attr::new(ERROR_KEY, error.to_string())
}

/// Like [`err`], but `None` yields an attribute with an empty key, which
/// every handler drops.
pub fn err_opt(error: Option<&(impl Display + ?Sized)>) -> Attr {
    error.map_or_else(|| Attr::new("", Value::Null), err)
}

/// `caller` attribute holding `file:line` of the call site.
#[track_caller]
#[must_use]
pub fn caller() -> Attr {
    Attr::new(CALLER_KEY, Source::caller().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn err_uses_the_display_text() {
        let error = io::Error::other("disk on fire");
        let attr = err(&error);
        assert_eq!(attr.key, ERROR_KEY);
        assert_eq!(attr.value, Value::from("disk on fire"));
    }

    #[test]
    fn missing_error_is_dropped_later() {
        let attr = err_opt(None::<&io::Error>);
        assert!(attr.has_empty_key());
    }

    #[test]
    fn caller_points_at_this_file() {
        let line = line!() + 1;
        let attr = caller();
        assert_eq!(attr.key, CALLER_KEY);
        let expected = format!("{}:{line}", file!());
        assert_eq!(attr.value, Value::from(expected));
    }
}
