//! REST client binding a transport to a base URL and credentials.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use url::Url;

use crate::{
    AuthProvider, BearerToken, Error, HttpClient, NoAuth, Request, Response, RestClient, Result,
};

/// Binds any [`HttpClient`] to a base URL and an [`AuthProvider`].
///
/// Cloning is cheap: the auth provider is shared, and transports like
/// [`crate::HyperClient`] share their connection pool.
///
/// # Example
///
/// ```ignore
/// use tanuki::{ApiClient, ApiRequest, HyperClient, RestClientExt};
///
/// let gitlab = ApiClient::new(HyperClient::new(), "https://gitlab.com/api/v4")?
///     .with_bearer_token(std::env::var("GITLAB_TOKEN")?);
///
/// let projects = gitlab
///     .fetch::<Vec<Project>>(ApiRequest::get("/projects").per_page(50))
///     .await?;
/// ```
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
    auth: Arc<dyn AuthProvider>,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for ApiClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl<C> ApiClient<C> {
    /// Create an unauthenticated client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_url(
            client,
            Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        ))
    }

    /// Create an unauthenticated client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            auth: Arc::new(NoAuth),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        self.with_auth(BearerToken::new(token))
    }

    /// Use `auth` as the header source for every request.
    #[must_use]
    pub fn with_auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C> RestClient for ApiClient<C>
where
    C: HttpClient + Clone,
{
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self.client.execute(request)
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn auth_header(&self) -> Option<(String, String)> {
        self.auth.auth_header()
    }
}
