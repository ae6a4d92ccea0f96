//! Request logging with `tracing`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Level, field};

use crate::{Error, Request, Response, Result};

/// Wraps a service in [`Logging`].
///
/// Every call runs inside an `http_request` span with `method`, `endpoint`
/// (the template, or the URL path for fixed URLs), then `status` and
/// `elapsed_ms` once the response is in. Failures are logged at `WARN`.
#[derive(Debug, Clone, Copy)]
pub struct LoggingLayer {
    level: Level,
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingLayer {
    /// Summary events at `INFO`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events at `DEBUG`, with the full URL and header names.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }

    /// Level of the success events.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service logging each request it forwards.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: Level,
}

/// Endpoint label for a request: its template, or its URL path.
fn endpoint_label(request: &Request) -> String {
    request.template().map_or_else(
        || request.url().path().to_string(),
        |template| template.as_str().to_string(),
    )
}

fn log_sent(level: Level, request: &Request) {
    if level == Level::DEBUG {
        let headers: Vec<&str> = request.headers().keys().map(String::as_str).collect();
        tracing::debug!(url = %request.full_url(), ?headers, "sending request");
    } else {
        tracing::info!("sending request");
    }
}

fn log_done(level: Level, outcome: &Result<Response>) {
    match outcome {
        Ok(response) if response.is_success() => {
            if level == Level::DEBUG {
                tracing::debug!(bytes = response.body().len(), "request completed");
            } else {
                tracing::info!("request completed");
            }
        }
        Ok(_) => tracing::warn!("request failed with HTTP error"),
        Err(err) => tracing::warn!(error = %err, "request failed"),
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = tracing::info_span!(
            "http_request",
            method = %request.method(),
            endpoint = %endpoint_label(&request),
            status = field::Empty,
            elapsed_ms = field::Empty,
        );
        let level = self.level;
        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                log_sent(level, &request);
                let started = Instant::now();
                let outcome = inner.call(request).await;

                let current = tracing::Span::current();
                current.record(
                    "elapsed_ms",
                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                );
                if let Ok(response) = &outcome {
                    current.record("status", response.status());
                }
                log_done(level, &outcome);
                outcome
            }
            .instrument(span),
        )
    }
}
