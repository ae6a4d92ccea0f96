//! API calls and their materialization into transport requests.

use http::Method;
use url::Url;

use crate::{
    AuthProvider, EndpointTemplate, Error, OptionCollection, OptionField, Options, Request,
    Result,
};

/// One API call: method, endpoint template and options, or a fixed URL.
///
/// A fixed URL bypasses template expansion and options entirely; it is used
/// to re-fetch an exact link.
///
/// # Example
///
/// ```
/// use tanuki_core::{ApiRequest, NoAuth, OptionField};
///
/// let request = ApiRequest::get("/projects/{id}/repository/branches")
///     .custom_option(OptionField::query("id", 42))
///     .custom_option(OptionField::query("search", "release"))
///     .per_page(50);
///
/// let base_url = "https://gitlab.example.com/api/v4".parse().expect("valid URL");
/// let built = request.build(&base_url, &NoAuth).expect("build");
/// assert_eq!(
///     built.full_url().as_str(),
///     "https://gitlab.example.com/api/v4/projects/42/repository/branches?per_page=50&search=release"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: EndpointTemplate,
    options: OptionCollection,
    fixed_url: Option<Url>,
}

impl ApiRequest {
    /// Call `method` on `endpoint` with no options set.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<EndpointTemplate>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            options: OptionCollection::new(),
            fixed_url: None,
        }
    }

    /// `GET` call.
    #[must_use]
    pub fn get(endpoint: impl Into<EndpointTemplate>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// `POST` call.
    #[must_use]
    pub fn post(endpoint: impl Into<EndpointTemplate>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// `PUT` call.
    #[must_use]
    pub fn put(endpoint: impl Into<EndpointTemplate>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    /// `PATCH` call.
    #[must_use]
    pub fn patch(endpoint: impl Into<EndpointTemplate>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// `DELETE` call.
    #[must_use]
    pub fn delete(endpoint: impl Into<EndpointTemplate>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Call `method` on an exact URL.
    #[must_use]
    pub fn fixed(method: Method, url: Url) -> Self {
        Self {
            method,
            endpoint: EndpointTemplate::new(url.path()),
            options: OptionCollection::new(),
            fixed_url: Some(url),
        }
    }

    /// Replace the declared options with those of `options`.
    ///
    /// Custom options of `options` are appended after the ones already added;
    /// `page` and `per_page` are kept.
    #[must_use]
    pub fn with_options(mut self, options: impl Options) -> Self {
        let custom = options.custom();
        self.options = self.options.with_declared(options.declared());
        for field in custom {
            self.options.push_custom(field);
        }
        self
    }

    /// Build the options with a configuration callback.
    ///
    /// # Example
    ///
    /// ```
    /// use tanuki_core::{ApiRequest, OptionField, OptionLocation, Options};
    ///
    /// #[derive(Default)]
    /// struct Search { scope: Option<String> }
    ///
    /// impl Options for Search {
    ///     fn declared(&self) -> Vec<OptionField> {
    ///         vec![OptionField::new("scope", OptionLocation::Query, self.scope.clone().map(Into::into))]
    ///     }
    /// }
    ///
    /// let request = ApiRequest::get("/search").configure(|o: &mut Search| {
    ///     o.scope = Some("issues".to_string());
    /// });
    /// assert_eq!(request.options().declared()[0].key(), "scope");
    /// ```
    #[must_use]
    pub fn configure<O, F>(self, configure: F) -> Self
    where
        O: Options + Default,
        F: FnOnce(&mut O),
    {
        let mut options = O::default();
        configure(&mut options);
        self.with_options(options)
    }

    /// Set the requested page.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.options.set_page(page);
        self
    }

    /// Set the requested page size.
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.options.set_per_page(per_page);
        self
    }

    /// Append an ad-hoc option.
    #[must_use]
    pub fn custom_option(mut self, field: OptionField) -> Self {
        self.options.push_custom(field);
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint template.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointTemplate {
        &self.endpoint
    }

    /// Options of this call.
    #[must_use]
    pub const fn options(&self) -> &OptionCollection {
        &self.options
    }

    /// Mutable access to the options.
    #[must_use]
    pub fn options_mut(&mut self) -> &mut OptionCollection {
        &mut self.options
    }

    /// Fixed URL, if this call bypasses the template.
    #[must_use]
    pub const fn fixed_url(&self) -> Option<&Url> {
        self.fixed_url.as_ref()
    }

    /// A copy of this call asking for `page`.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        self.clone().page(page)
    }

    /// Materialize the transport request.
    ///
    /// The URL is `base_url` (trailing `/` trimmed) followed by the expanded
    /// endpoint; query items not used by the template become the query string.
    /// The auth header is attached when `auth` yields one.
    ///
    /// # Errors
    ///
    /// Nothing is built when an option cannot be encoded, a placeholder has no
    /// value, both a JSON body and a multipart form are declared, or the URL
    /// is invalid.
    pub fn build<A>(&self, base_url: &Url, auth: &A) -> Result<Request>
    where
        A: AuthProvider + ?Sized,
    {
        let builder = if let Some(url) = &self.fixed_url {
            Request::builder(self.method.clone(), url.clone())
        } else {
            let payload = self.options.encode()?;
            let path = self.endpoint.expand(&payload.query_items)?;
            let residual = self.endpoint.residual_query_items(&payload.query_items);

            let separator = if path.starts_with('/') { "" } else { "/" };
            let url = Url::parse(&format!(
                "{}{separator}{path}",
                base_url.as_str().trim_end_matches('/')
            ))?;

            let mut builder = Request::builder(self.method.clone(), url)
                .query_pairs(residual)
                .template(self.endpoint.clone());

            match (payload.json_body, payload.multipart_form) {
                (Some(_), Some(_)) => {
                    return Err(Error::invalid_request(format!(
                        "{} {} declares both a JSON body and a multipart form",
                        self.method, self.endpoint
                    )));
                }
                (Some(json), None) => builder = builder.json(&serde_json::Value::Object(json))?,
                (None, Some(form)) => builder = builder.multipart(form),
                (None, None) => {}
            }
            builder
        };

        let builder = match auth.auth_header() {
            Some((name, value)) => builder.header(name, value),
            None => builder,
        };
        let request = builder.build();

        tracing::debug!(
            method = %request.method(),
            endpoint = %self.endpoint,
            query_items = request.query_items().len(),
            fixed = self.fixed_url.is_some(),
            "request materialized"
        );

        Ok(request)
    }
}
