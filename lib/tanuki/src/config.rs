//! Transport configuration.

use std::borrow::Cow;
use std::time::Duration;

/// Default `User-Agent` sent by [`crate::HyperClient`].
pub const DEFAULT_USER_AGENT: &str = concat!("tanuki/", env!("CARGO_PKG_VERSION"));

/// Settings of a [`crate::HyperClient`].
///
/// ```
/// use std::time::Duration;
/// use tanuki::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("release-bot/2.1");
/// assert_eq!(config.user_agent(), Some("release-bot/2.1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    timeout: Duration,
    connect_timeout: Duration,
    pool_idle_per_host: usize,
    pool_idle_timeout: Duration,
    user_agent: Option<Cow<'static, str>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: Some(Cow::Borrowed(DEFAULT_USER_AGENT)),
        }
    }
}

impl ClientConfig {
    /// Time allowed from sending the request to receiving the response head.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Maximum idle connections kept per host.
    #[must_use]
    pub const fn with_pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = count;
        self
    }

    /// How long an idle connection stays in the pool.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// `User-Agent` added to requests that carry none.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<Cow<'static, str>>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send requests without a `User-Agent` unless they set one.
    #[must_use]
    pub fn without_user_agent(mut self) -> Self {
        self.user_agent = None;
        self
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(&self) -> usize {
        self.pool_idle_per_host
    }

    /// Idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(&self) -> Duration {
        self.pool_idle_timeout
    }

    /// Default `User-Agent`, if any.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
