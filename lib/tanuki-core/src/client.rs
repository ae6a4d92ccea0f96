//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution (the transport)
//! - [`RestClient`] - Transport bound to a base URL and an auth header source
//! - [`RestClientExt`] - Build, send and paginate [`ApiRequest`]s on any [`RestClient`]
//!
//! Implement [`RestClient`] directly for custom auth or testing.

use std::future::Future;

use url::Url;

use crate::{
    ApiRequest, Decoder, Error, JsonDecoder, Method, PaginatedResponse, Request, Response, Result,
};

/// Core HTTP client trait.
///
/// Implementations execute a fully built request and return status, headers
/// and body. Redirects, connection reuse and timeouts are their business.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Unreadable upload files
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

/// A client for one REST API.
///
/// # Example
///
/// ```ignore
/// use tanuki::{HttpClient, RestClient, Request, Response, Result};
/// use url::Url;
///
/// #[derive(Clone)]
/// struct PrivateTokenClient {
///     inner: HyperClient,
///     base_url: Url,
///     token: String,
/// }
///
/// impl RestClient for PrivateTokenClient {
///     fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
///         self.inner.execute(request)
///     }
///
///     fn base_url(&self) -> &Url {
///         &self.base_url
///     }
///
///     fn auth_header(&self) -> Option<(String, String)> {
///         Some(("PRIVATE-TOKEN".to_string(), self.token.clone()))
///     }
/// }
/// ```
pub trait RestClient: Clone + Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;

    /// Get the base URL for this client.
    ///
    /// Endpoint paths are appended to this URL.
    fn base_url(&self) -> &Url;

    /// Authentication header for the next request, if any.
    fn auth_header(&self) -> Option<(String, String)> {
        None
    }
}

/// Extension trait for [`RestClient`] with the request pipeline.
pub trait RestClientExt: RestClient {
    /// Build and execute `request`.
    ///
    /// # Errors
    ///
    /// Returns the build error (nothing is sent), the transport error, or
    /// [`Error::Http`] for a non-2xx status.
    fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<Response>> + Send {
        async move {
            let built = request.build(self.base_url(), &|| self.auth_header())?;
            let response = self.execute(built).await?;

            if !response.is_success() {
                tracing::debug!(
                    method = %request.method(),
                    endpoint = %request.endpoint(),
                    status = response.status(),
                    "non-success response"
                );
                return Err(Error::from_status(response.status(), response.into_body()));
            }
            Ok(response)
        }
    }

    /// Execute `request` and wrap the response in a JSON cursor that can
    /// fetch adjacent pages.
    ///
    /// # Errors
    ///
    /// See [`RestClientExt::send`].
    fn fetch<T>(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<PaginatedResponse<T, Self>>> + Send
    where
        T: Send,
        JsonDecoder: Decoder<T>,
    {
        self.fetch_with(request, JsonDecoder)
    }

    /// Like [`RestClientExt::fetch`] with a custom body decoder.
    ///
    /// # Errors
    ///
    /// See [`RestClientExt::send`].
    fn fetch_with<T, D>(
        &self,
        request: ApiRequest,
        decoder: D,
    ) -> impl Future<Output = Result<PaginatedResponse<T, Self, D>>> + Send
    where
        T: Send,
        D: Decoder<T> + Clone,
    {
        async move {
            let response = self.send(&request).await?;
            Ok(PaginatedResponse::new(
                response,
                decoder,
                Some((self.clone(), request)),
            ))
        }
    }

    /// `GET` an exact URL, such as a pagination link.
    ///
    /// The cursor has no origin request, so it cannot paginate.
    ///
    /// # Errors
    ///
    /// See [`RestClientExt::send`].
    fn fetch_url<T>(
        &self,
        url: Url,
    ) -> impl Future<Output = Result<PaginatedResponse<T, Self>>> + Send
    where
        T: Send,
        JsonDecoder: Decoder<T>,
    {
        async move {
            let response = self.send(&ApiRequest::fixed(Method::GET, url)).await?;
            Ok(PaginatedResponse::new(response, JsonDecoder, None))
        }
    }
}

// Blanket implementation for all RestClient implementors
impl<T: RestClient> RestClientExt for T {}
