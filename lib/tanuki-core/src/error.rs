//! Error types for tanuki.

use std::path::Path;

use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::OptionLocation;

/// Main error type for tanuki operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or a generic one.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A path placeholder had no matching option value.
    #[display("missing path parameter '{name}' for endpoint '{template}'")]
    #[from(skip)]
    MissingPathParameter {
        /// Placeholder name.
        #[error(not(source))]
        name: String,
        /// Endpoint template.
        #[error(not(source))]
        template: String,
    },

    /// An option value has no encoding for its declared location.
    #[display("unsupported {location} value for option '{key}': {reason}")]
    #[from(skip)]
    UnsupportedValue {
        /// Option key.
        #[error(not(source))]
        key: String,
        /// Declared location.
        location: OptionLocation,
        /// What is wrong with the value.
        #[error(not(source))]
        reason: String,
    },

    /// A file to upload could not be read.
    #[display("cannot read file '{path}': {message}")]
    #[from(skip)]
    File {
        /// File path.
        #[error(not(source))]
        path: String,
        /// Error message.
        #[error(not(source))]
        message: String,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "commits[0].author").
        path: String,
        /// Error message.
        message: String,
    },

    /// A value was requested from a response without a body.
    #[display("response has no data")]
    #[from(skip)]
    NoData,

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The next page was requested on the last page.
    #[display("page limit reached: page {page} of {total_pages}")]
    #[from(skip)]
    PageLimitReached {
        /// Current page.
        page: u32,
        /// Total number of pages.
        total_pages: u32,
    },

    /// The previous page was requested on the first page.
    #[display("no page before page {page}")]
    #[from(skip)]
    NoPreviousPage {
        /// Current page.
        page: u32,
    },

    /// The response does not know which request produced it.
    #[display("cannot derive a page request: response has no origin request")]
    #[from(skip)]
    MissingOrigin,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error body shape of GitLab-style APIs.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Convert a non-2xx response into an [`Error::Http`].
    ///
    /// The message comes from a `{"message": "..."}` body when there is one,
    /// otherwise it is `HTTP response received: <status>`.
    #[must_use]
    pub fn from_status(status: u16, body: bytes::Bytes) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .map(|decoded| decoded.message)
            .unwrap_or_else(|_| format!("HTTP response received: {status}"));

        if body.is_empty() {
            Self::http(status, message)
        } else {
            Self::http_with_body(status, message, body)
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a missing path parameter error.
    #[must_use]
    pub fn missing_path_parameter(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::MissingPathParameter {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Create an unsupported value error.
    #[must_use]
    pub fn unsupported_value(
        key: impl Into<String>,
        location: OptionLocation,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedValue {
            key: key.into(),
            location,
            reason: reason.into(),
        }
    }

    /// Create a file error.
    #[must_use]
    pub fn file(path: &Path, message: impl Into<String>) -> Self {
        Self::File {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` for the pagination boundary conditions (no more pages
    /// in the requested direction).
    #[must_use]
    pub const fn is_page_limit(&self) -> bool {
        matches!(
            self,
            Self::PageLimitReached { .. } | Self::NoPreviousPage { .. }
        )
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(Error::http(404, "Not Found").to_string(), "HTTP error 404: Not Found");
        assert_eq!(Error::Timeout.to_string(), "request timeout");
        assert_eq!(
            Error::missing_path_parameter("sha", "/projects/{id}/commits/{sha}").to_string(),
            "missing path parameter 'sha' for endpoint '/projects/{id}/commits/{sha}'"
        );
        assert_eq!(
            Error::unsupported_value("avatar", OptionLocation::Query, "no encoding").to_string(),
            "unsupported query value for option 'avatar': no encoding"
        );
        assert_eq!(
            Error::PageLimitReached {
                page: 5,
                total_pages: 5
            }
            .to_string(),
            "page limit reached: page 5 of 5"
        );
    }

    #[test]
    fn from_status_uses_message_body() {
        let err = Error::from_status(404, Bytes::from(r#"{"message":"not found"}"#));
        let Error::Http {
            status,
            message,
            body,
        } = err
        else {
            panic!("expected HTTP error");
        };
        assert_eq!(status, 404);
        assert_eq!(message, "not found");
        assert!(body.is_some());
    }

    #[test]
    fn from_status_falls_back_to_default_message() {
        let err = Error::from_status(404, Bytes::from("<html>oops</html>"));
        assert!(matches!(
            &err,
            Error::Http { message, .. } if message == "HTTP response received: 404"
        ));

        // Non-string message field is not the documented shape either
        let err = Error::from_status(400, Bytes::from(r#"{"message":{"name":["taken"]}}"#));
        assert!(matches!(
            &err,
            Error::Http { message, .. } if message == "HTTP response received: 400"
        ));

        let err = Error::from_status(500, Bytes::new());
        assert!(err.body().is_none());
        assert!(err.is_server_error());
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(err.is_not_found());
        assert!(!err.is_server_error());

        assert_eq!(Error::Timeout.status(), None);
        assert!(!Error::Timeout.is_client_error());
    }

    #[test]
    fn page_limit_conditions() {
        assert!(
            Error::PageLimitReached {
                page: 3,
                total_pages: 3
            }
            .is_page_limit()
        );
        assert!(Error::NoPreviousPage { page: 1 }.is_page_limit());
        assert!(!Error::MissingOrigin.is_page_limit());
        assert!(!Error::http(404, "x").is_page_limit());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let err = Error::http_with_body(404, "Not Found", Bytes::from(r#"{"error": "nope"}"#));
        let decoded = err.decode_body::<ApiError>().expect("has body").expect("decodes");
        assert_eq!(decoded.error, "nope");

        assert!(Error::http(404, "Not Found").decode_body::<ApiError>().is_none());
        assert!(Error::Timeout.decode_body::<ApiError>().is_none());
    }
}
