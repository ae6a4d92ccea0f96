//! Values carried by request options.
//!
//! A [`Value`] is the tagged union every option slot stores. Conversions from
//! the usual Rust types are provided through `From`, so typed option
//! collections can keep plain field types (`Option<u64>`, `Option<Vec<String>>`,
//! `Option<NaiveDate>`, ...) and still feed the encoder.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::{Error, OptionLocation, Result};

/// Free-form `string -> value` map, used for hash-shaped options.
pub type Hash = serde_json::Map<String, serde_json::Value>;

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain string.
    String(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer (ids above `i64::MAX` stay exact).
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean, encoded as `true` / `false`.
    Bool(bool),
    /// Timestamp, encoded as RFC 3339 with milliseconds.
    DateTime(DateTime<Utc>),
    /// Date without time, encoded as `yyyyMMdd`.
    Date(NaiveDate),
    /// Enum-like value with a fixed wire token.
    Enum(Cow<'static, str>),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map.
    Hash(Hash),
    /// Arbitrary JSON structure.
    Json(serde_json::Value),
    /// Local file to upload.
    File(PathBuf),
}

impl Value {
    /// Build an enum value from its wire token.
    #[must_use]
    pub fn wire(token: impl Into<Cow<'static, str>>) -> Self {
        Self::Enum(token.into())
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) | Self::Unsigned(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::DateTime(_) => "date-time",
            Self::Date(_) => "date",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Hash(_) => "hash",
            Self::Json(_) => "json",
            Self::File(_) => "file",
        }
    }

    /// Returns `true` for values that encode to a single string.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        match self {
            Self::List(_) | Self::Hash(_) | Self::File(_) => false,
            Self::Json(json) => !matches!(
                json,
                serde_json::Value::Array(_) | serde_json::Value::Object(_)
            ),
            _ => true,
        }
    }

    /// Wire string of a scalar value, `None` for compound values.
    #[must_use]
    pub fn scalar_string(&self) -> Option<String> {
        let text = match self {
            Self::String(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::DateTime(ts) => format_timestamp(ts),
            Self::Date(date) => format_date(*date),
            Self::Enum(token) => token.to_string(),
            Self::Json(json) => json_scalar_string(json)?,
            Self::List(_) | Self::Hash(_) | Self::File(_) => return None,
        };
        Some(text)
    }

    /// JSON form of the value, inserted verbatim into request bodies.
    ///
    /// Files have no JSON form, and non-finite floats cannot be represented.
    pub fn to_json(&self, key: &str) -> Result<serde_json::Value> {
        let json = match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Unsigned(n) => serde_json::Value::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or_else(|| Error::unsupported_value(key, OptionLocation::Body, "non-finite float"))?,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::DateTime(ts) => serde_json::Value::String(format_timestamp(ts)),
            Self::Date(date) => serde_json::Value::String(format_date(*date)),
            Self::Enum(token) => serde_json::Value::String(token.to_string()),
            Self::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json(key))
                    .collect::<Result<_>>()?,
            ),
            Self::Hash(map) => serde_json::Value::Object(map.clone()),
            Self::Json(json) => json.clone(),
            Self::File(_) => {
                return Err(Error::unsupported_value(
                    key,
                    OptionLocation::Body,
                    "file values can only be uploaded as multipart parts",
                ));
            }
        };
        Ok(json)
    }
}

/// RFC 3339 timestamp with millisecond precision, e.g. `2023-01-01T00:00:00.000Z`.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Compact date form, e.g. `20230101`.
fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// String form of a JSON scalar. `null` becomes the empty string.
pub(crate) fn json_scalar_string(json: &serde_json::Value) -> Option<String> {
    match json {
        serde_json::Value::Null => Some(String::new()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::Unsigned(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Hash> for Value {
    fn from(value: Hash) -> Self {
        Self::Hash(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

impl From<&Path> for Value {
    fn from(value: &Path) -> Self {
        Self::File(value.to_path_buf())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
