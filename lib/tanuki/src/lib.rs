//! Typed REST request encoding and pagination for GitLab-style APIs.
//!
//! Declare option sets with derives, describe calls as [`ApiRequest`]s and let
//! the engine turn them into HTTP requests: path placeholders filled, query
//! strings with bracket notation, JSON or multipart bodies. Responses come back
//! as [`PaginatedResponse`] cursors.
//!
//! # Example
//!
//! ```ignore
//! use tanuki::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, OptionEnum)]
//! pub enum State { Opened, Closed, All }
//!
//! #[derive(Debug, Default, Options)]
//! pub struct ListIssues {
//!     state: Option<State>,
//!     labels: Option<Vec<String>>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Issue { iid: u64, title: String }
//!
//! let gitlab = ApiClient::new(HyperClient::new(), "https://gitlab.com/api/v4")?
//!     .with_bearer_token(token);
//!
//! let request = ApiRequest::get("/projects/{id}/issues")
//!     .configure(|o: &mut ListIssues| o.state = Some(State::Opened))
//!     .custom_option(OptionField::query("id", "group/project"));
//!
//! let mut page = gitlab.fetch::<Vec<Issue>>(request).await?;
//! while let Ok(next) = page.next_page().await {
//!     page = next;
//! }
//! ```

mod api_client;
mod client;
mod config;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use api_client::ApiClient;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, DEFAULT_USER_AGENT};

// Re-export tower for middleware composition
pub use tower;

// Re-export the engine; macro-generated code refers to `::tanuki::*`
pub use tanuki_core::{
    ApiRequest, AuthProvider, BearerToken, Body, ContentType, Decoder, EncodedPayload,
    EndpointTemplate, Error, Form, Fragment, Hash, HttpClient, JsonDecoder, Method, NEXT_PAGE_HEADER,
    NoAuth, OptionCollection, OptionField, OptionLocation, Options, PAGE_HEADER, PAGE_KEY,
    PER_PAGE_HEADER, PER_PAGE_KEY, PREV_PAGE_HEADER, PageInfo, PaginatedResponse, Part, PartData,
    Request, RequestBuilder, Response, RestClient, RestClientExt, Result, StatusCode,
    TOTAL_HEADER, TOTAL_PAGES_HEADER, Value, encoding, from_json, header, to_json,
    to_query_string,
};

pub use url;

// Re-export macros
pub use tanuki_macro::{OptionEnum, Options};
