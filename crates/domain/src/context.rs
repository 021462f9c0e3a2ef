//! Ambient attributes carried alongside a call, and errors that remember them.

use crate::value::{Attr, Value};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Boxed error accepted by [`wrap_ctx`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Key used by [`LogContext::with_op`].
pub const OP_KEY: &str = "op";

/// Immutable bag of ambient attributes, sorted by key.
///
/// Cloning is cheap (the map is shared). Every update returns a new context;
/// the receiver is never changed, so a context handed to another thread keeps
/// the snapshot it was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    values: Arc<BTreeMap<String, Value>>,
}

impl LogContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`. Empty keys leave the context
    /// unchanged.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key.is_empty() {
            return self.clone();
        }
        let mut values = (*self.values).clone();
        values.insert(key, value.into());
        Self {
            values: Arc::new(values),
        }
    }

    /// Returns a copy tagged with the current operation name.
    #[must_use]
    pub fn with_op(&self, op: impl Into<String>) -> Self {
        self.with(OP_KEY, op.into())
    }

    /// Returns a copy overlaid with `other`; entries in `other` win.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut values = (*self.values).clone();
        values.extend(
            other
                .values
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self {
            values: Arc::new(values),
        }
    }

    /// Extract the bag as attributes, in key order.
    #[must_use]
    pub fn attrs(&self) -> Vec<Attr> {
        self.values
            .iter()
            .map(|(key, value)| Attr::new(key.clone(), value.clone()))
            .collect()
    }

    /// Look up a single value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LogContext
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self {
            values: Arc::new(values),
        }
    }
}

/// An error carrying the log context that was active when it was raised.
///
/// Display and `source` are those of the wrapped error, so wrapping is
/// invisible to callers that only print or walk the chain.
#[derive(Debug)]
pub struct ContextualError {
    inner: BoxError,
    context: LogContext,
}

impl ContextualError {
    /// Snapshot carried by this error.
    #[must_use]
    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// The wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Unwrap into the original error, discarding the snapshot.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for ContextualError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, formatter)
    }
}

impl StdError for ContextualError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// Attach a snapshot of `ctx` to `err`.
pub fn wrap_ctx(ctx: &LogContext, err: impl Into<BoxError>) -> ContextualError {
    ContextualError {
        inner: err.into(),
        context: ctx.clone(),
    }
}

/// Recover the context stored in `err` (or anywhere in its `source` chain)
/// and overlay it on `ctx`. Returns `ctx` unchanged when no snapshot is found.
#[must_use]
pub fn error_ctx(ctx: &LogContext, err: &(dyn StdError + 'static)) -> LogContext {
    let mut current = Some(err);
    while let Some(error) = current {
        if let Some(contextual) = error.downcast_ref::<ContextualError>() {
            return ctx.merge(&contextual.context);
        }
        current = error.source();
    }
    ctx.clone()
}
