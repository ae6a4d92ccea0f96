//! Transport-ready HTTP requests.
//!
//! A [`Request`] is what the engine hands to an [`crate::HttpClient`]: method,
//! URL, query items, headers and an optional body. Query items are kept apart
//! from the URL until [`Request::full_url`] so bracketed names survive intact.
//!
//! # Example
//!
//! ```
//! use tanuki_core::{Method, Request};
//!
//! let url = "https://gitlab.example.com/api/v4/projects".parse().expect("valid URL");
//! let request = Request::builder(Method::GET, url)
//!     .header("Accept", "application/json")
//!     .query("ids[]", "1")
//!     .query("ids[]", "2")
//!     .build();
//!
//! assert_eq!(
//!     request.full_url().as_str(),
//!     "https://gitlab.example.com/api/v4/projects?ids[]=1&ids[]=2"
//! );
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use url::Url;

use crate::{ContentType, EndpointTemplate, Form, Result, to_query_string};

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Encoded bytes (JSON).
    Bytes(Bytes),
    /// Multipart form; file parts are read by the transport.
    Multipart(Form),
}

/// An HTTP request with method, URL, query items, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    query_items: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<Body>,
    template: Option<EndpointTemplate>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL, without the query items.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Query items, in order.
    #[must_use]
    pub fn query_items(&self) -> &[(String, String)] {
        &self.query_items
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Endpoint template the URL was expanded from, if any.
    #[must_use]
    pub const fn template(&self) -> Option<&EndpointTemplate> {
        self.template.as_ref()
    }

    /// URL with the query items appended to any query already present.
    #[must_use]
    pub fn full_url(&self) -> Url {
        if self.query_items.is_empty() {
            return self.url.clone();
        }

        let encoded = to_query_string(&self.query_items);
        let query = match self.url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };

        let mut url = self.url.clone();
        url.set_query(Some(&query));
        url
    }

    /// Consume into (method, full url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<Body>) {
        let url = self.full_url();
        (self.method, url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    query_items: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<Body>,
    template: Option<EndpointTemplate>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query_items: Vec::new(),
            headers: HashMap::new(),
            body: None,
            template: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Appends a query item.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_items.push((name.into(), value.into()));
        self
    }

    /// Appends multiple query items.
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query_items.extend(pairs);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Records the endpoint template the URL was expanded from.
    #[must_use]
    pub fn template(mut self, template: EndpointTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", ContentType::Json.as_str())
            .body(Body::Bytes(body)))
    }

    /// Set a multipart body.
    #[must_use]
    pub fn multipart(self, form: Form) -> Self {
        let content_type = form.content_type();
        self.header("Content-Type", content_type)
            .body(Body::Multipart(form))
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            query_items: self.query_items,
            headers: self.headers,
            body: self.body,
            template: self.template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Part;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::GET, url("https://gitlab.example.com/api/v4/user"))
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://gitlab.example.com/api/v4/user");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
        assert!(request.template().is_none());
    }

    #[test]
    fn full_url_keeps_brackets() {
        let request = Request::builder(Method::GET, url("https://gitlab.example.com/api/v4/projects"))
            .query("variables[0][key]", "VAR1")
            .query("labels[]", "bug")
            .build();

        assert_eq!(
            request.full_url().as_str(),
            "https://gitlab.example.com/api/v4/projects?variables[0][key]=VAR1&labels[]=bug"
        );
        // The base URL is untouched.
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn full_url_appends_to_existing_query() {
        let request = Request::builder(
            Method::GET,
            url("https://gitlab.example.com/api/v4/projects?page=2&per_page=20"),
        )
        .query("search", "tanuki")
        .build();

        assert_eq!(
            request.full_url().as_str(),
            "https://gitlab.example.com/api/v4/projects?page=2&per_page=20&search=tanuki"
        );
    }

    #[test]
    fn request_builder_json() {
        let request = Request::builder(Method::POST, url("https://gitlab.example.com/api/v4/projects"))
            .json(&serde_json::json!({"name": "tanuki"}))
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body(),
            Some(&Body::Bytes(Bytes::from(r#"{"name":"tanuki"}"#)))
        );
    }

    #[test]
    fn request_builder_multipart() {
        let form = Form::with_boundary("xyz").part(Part::text("name", "logo"));
        let request = Request::builder(Method::PUT, url("https://gitlab.example.com/api/v4/projects/1"))
            .multipart(form.clone())
            .build();

        assert_eq!(
            request.header("Content-Type"),
            Some("multipart/form-data; boundary=xyz")
        );
        assert_eq!(request.body(), Some(&Body::Multipart(form)));
    }

    #[test]
    fn into_parts_uses_full_url() {
        let request = Request::builder(Method::DELETE, url("https://gitlab.example.com/api/v4/projects/1"))
            .query("ids[]", "1")
            .template(EndpointTemplate::new("/projects/{id}"))
            .build();
        assert_eq!(request.template().map(EndpointTemplate::as_str), Some("/projects/{id}"));

        let (method, full_url, headers, body) = request.into_parts();
        assert_eq!(method, Method::DELETE);
        assert_eq!(full_url.query(), Some("ids[]=1"));
        assert!(headers.is_empty());
        assert!(body.is_none());
    }
}
