//! Attribute keys and dynamically-typed values.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use grovelog_shared::{ErrorCode, LogError};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// A single structured key/value pair.
///
/// An attribute with an empty key is a no-op: every handler boundary drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Attribute key. Empty keys are dropped.
    pub key: String,
    /// Attribute value.
    pub value: Value,
}

impl Attr {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a group attribute whose members are namespaced under `key`.
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Self>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs.into_iter().collect()),
        }
    }

    /// Returns true when the attribute would be dropped.
    #[must_use]
    pub fn has_empty_key(&self) -> bool {
        self.key.is_empty()
    }
}

/// Dynamically-typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    I64(i64),
    /// Unsigned integer.
    U64(u64),
    /// Floating point. Non-finite values cannot be encoded as JSON.
    F64(f64),
    /// UTF-8 string.
    Str(String),
    /// Elapsed time.
    Duration(Duration),
    /// Point in time.
    Time(DateTime<FixedOffset>),
    /// Ordered sequence.
    Seq(Vec<Value>),
    /// Nested attributes, flattened under the owning attribute's key.
    Group(Vec<Attr>),
    /// Arbitrary pre-serialized payload.
    Json(serde_json::Value),
}

impl Value {
    /// Capture any serializable value.
    ///
    /// Fails with an encoding error when the value has no JSON form
    /// (e.g. a map with non-string keys).
    pub fn from_serialize<T>(value: &T) -> Result<Self, LogError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value).map(Self::Json).map_err(|error| {
            LogError::encoding(
                ErrorCode::unsupported_value(),
                format!("value has no JSON form: {error}"),
            )
            .with_source(error)
        })
    }

    /// Returns the nested attributes if this is a group.
    #[must_use]
    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Self::Group(attrs) => Some(attrs),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::I64(value) => serializer.serialize_i64(*value),
            Self::U64(value) => serializer.serialize_u64(*value),
            Self::F64(value) if value.is_finite() => serializer.serialize_f64(*value),
            Self::F64(value) => Err(S::Error::custom(format!(
                "unsupported value: {value}"
            ))),
            Self::Str(value) => serializer.serialize_str(value),
            Self::Duration(value) => {
                serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
            },
            Self::Time(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            },
            Self::Seq(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            },
            Self::Group(attrs) => {
                let mut map = serializer.serialize_map(None)?;
                for attr in attrs.iter().filter(|attr| !attr.has_empty_key()) {
                    map.serialize_entry(&attr.key, &attr.value)?;
                }
                map.end()
            },
            Self::Json(value) => value.serialize(serializer),
        }
    }
}

/// Text rendering used by the `key=value` encoder.
impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("<nil>"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::I64(value) => write!(formatter, "{value}"),
            Self::U64(value) => write!(formatter, "{value}"),
            Self::F64(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
            Self::Duration(value) => write!(formatter, "{value:?}"),
            Self::Time(value) => {
                formatter.write_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
            },
            Self::Seq(values) => {
                formatter.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(" ")?;
                    }
                    write!(formatter, "{value}")?;
                }
                formatter.write_str("]")
            },
            Self::Group(attrs) => {
                formatter.write_str("[")?;
                let mut first = true;
                for attr in attrs.iter().filter(|attr| !attr.has_empty_key()) {
                    if !first {
                        formatter.write_str(" ")?;
                    }
                    first = false;
                    write!(formatter, "{}={}", attr.key, attr.value)?;
                }
                formatter.write_str("]")
            },
            Self::Json(value) => write!(formatter, "{value}"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, [$($source:ty),* $(,)?]) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

value_from!(I64, i64, [i8, i16, i32, i64]);
value_from!(U64, u64, [u8, u16, u32, u64]);
value_from!(F64, f64, [f32, f64]);
value_from!(Str, String, [&str, String, Box<str>, char]);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or(Self::I64(i64::MAX), Self::I64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or(Self::U64(u64::MAX), Self::U64)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Time(value)
    }
}

impl From<DateTime<Local>> for Value {
    fn from(value: DateTime<Local>) -> Self {
        Self::Time(value.fixed_offset())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value.fixed_offset())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Self>,
{
    fn from(values: Vec<T>) -> Self {
        Self::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
