//! Authentication header providers.

use std::fmt;

/// Source of the authentication header, asked once per built request.
///
/// Returning `None` sends the request unauthenticated. Closures returning
/// `Option<(String, String)>` are providers too.
pub trait AuthProvider: Send + Sync {
    /// Header name and value to attach, if any.
    fn auth_header(&self) -> Option<(String, String)>;
}

impl<F> AuthProvider for F
where
    F: Fn() -> Option<(String, String)> + Send + Sync,
{
    fn auth_header(&self) -> Option<(String, String)> {
        self()
    }
}

/// No authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn auth_header(&self) -> Option<(String, String)> {
        None
    }
}

/// `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a provider for `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

// The token stays out of logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"***").finish()
    }
}

impl AuthProvider for BearerToken {
    fn auth_header(&self) -> Option<(String, String)> {
        Some((
            http::header::AUTHORIZATION.as_str().to_string(),
            format!("Bearer {}", self.0),
        ))
    }
}
