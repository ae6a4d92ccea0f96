//! Body and query-string serialization utilities.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::Result;

/// Characters escaped in query names and values.
///
/// Brackets stay literal so array and hash keys (`ids[]`, `variables[0][key]`)
/// reach the server unchanged.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'[')
    .remove(b']');

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Multipart form content type (`multipart/form-data`), without boundary.
    Multipart,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Multipart => "multipart/form-data",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use tanuki_core::to_json;
///
/// let body = serde_json::json!({"title": "Fix"});
/// let bytes = to_json(&body).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"title":"Fix"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed
/// (e.g. `author.name`).
///
/// # Errors
///
/// Returns [`crate::Error::JsonDeserialization`] if decoding fails.
///
/// # Example
///
/// ```
/// use tanuki_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Branch { name: String }
///
/// let branch: Branch = from_json(br#"{"name":"main"}"#).expect("deserialize");
/// assert_eq!(branch.name, "main");
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Join query pairs into a query string, keeping brackets literal.
///
/// # Example
///
/// ```
/// use tanuki_core::to_query_string;
///
/// let pairs = vec![
///     ("ids[]".to_string(), "1".to_string()),
///     ("ids[]".to_string(), "2".to_string()),
///     ("search".to_string(), "a b&c".to_string()),
/// ];
/// assert_eq!(to_query_string(&pairs), "ids[]=1&ids[]=2&search=a%20b%26c");
/// ```
#[must_use]
pub fn to_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(name, QUERY_ENCODE_SET),
                utf8_percent_encode(value, QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
