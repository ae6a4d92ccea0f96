//! HTTP response handling.
//!
//! [`Response`] provides access to status, headers, and body with JSON/text
//! deserialization. Header lookup ignores case.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Result};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, Bytes) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Turn a non-2xx response into [`Error::Http`].
    ///
    /// # Errors
    ///
    /// Returns the HTTP error when the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_status(self.status, self.body))
        }
    }

    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an empty body, or the decoding error.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Err(Error::NoData);
        }
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn response_basic() {
        let response = Response::new(
            200,
            headers(&[("Content-Type", "application/json")]),
            Bytes::from(r#"{"id":1}"#),
        );

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = Response::new(200, headers(&[("x-total-pages", "5")]), Bytes::new());
        assert_eq!(response.header("X-Total-Pages"), Some("5"));
        assert_eq!(response.header("x-total-pages"), Some("5"));
        assert_eq!(response.header("X-Page"), None);
    }

    #[test]
    fn response_status_checks() {
        assert!(Response::new(404, HashMap::new(), Bytes::new()).is_client_error());
        assert!(Response::new(502, HashMap::new(), Bytes::new()).is_server_error());
    }

    #[test]
    fn error_for_status_parses_message() {
        let response = Response::new(404, HashMap::new(), Bytes::from(r#"{"message":"not found"}"#));
        let err = response.error_for_status().expect_err("404");
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, Error::Http { ref message, .. } if message == "not found"));

        let ok = Response::new(204, HashMap::new(), Bytes::new());
        assert!(ok.error_for_status().is_ok());
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Project {
            id: u64,
            name: String,
        }

        let response = Response::new(200, HashMap::new(), Bytes::from(r#"{"id":1,"name":"tanuki"}"#));
        let project: Project = response.json().expect("deserialize");
        assert_eq!(
            project,
            Project {
                id: 1,
                name: "tanuki".to_string()
            }
        );
    }

    #[test]
    fn empty_body_has_no_data() {
        let response = Response::new(200, HashMap::new(), Bytes::new());
        let err = response.json::<serde_json::Value>().expect_err("empty");
        assert!(matches!(err, Error::NoData));
    }

    #[test]
    fn response_text() {
        let response = Response::new(200, HashMap::new(), Bytes::from("Hello, World!"));
        assert_eq!(response.text().expect("text"), "Hello, World!");
    }
}
