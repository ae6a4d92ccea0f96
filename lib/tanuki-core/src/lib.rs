//! Core types and traits for the tanuki REST request engine.
//!
//! This crate turns typed option sets into transport-ready HTTP requests and
//! wraps responses into pagination cursors:
//! - [`Value`], [`OptionField`], [`OptionLocation`] - typed option slots
//! - [`Options`], [`OptionCollection`], [`EncodedPayload`] - option sets and their encoding
//! - [`EndpointTemplate`] - `{name}` path templates
//! - [`ApiRequest`] - one API call, built into a [`Request`]
//! - [`Response`], [`PageInfo`], [`PaginatedResponse`] - responses and cursors
//! - [`HttpClient`], [`RestClient`], [`RestClientExt`] - client traits
//! - [`AuthProvider`] - authentication header source
//! - [`Error`] and [`Result`] - Error handling
//!
//! The engine performs no I/O; a transport implementing [`HttpClient`] does.

mod api_request;
mod auth;
mod client;
mod collection;
pub mod encoding;
mod endpoint;
mod error;
mod multipart;
mod option;
mod pagination;
pub mod prelude;
mod request;
mod response;
mod value;
mod wire;

pub use api_request::ApiRequest;
pub use auth::{AuthProvider, BearerToken, NoAuth};
pub use client::{HttpClient, RestClient, RestClientExt};
pub use collection::{EncodedPayload, OptionCollection, Options, PAGE_KEY, PER_PAGE_KEY};
pub use encoding::Fragment;
pub use endpoint::EndpointTemplate;
pub use error::{Error, Result};
pub use multipart::{Form, Part, PartData};
pub use option::{OptionField, OptionLocation};
pub use pagination::{
    Decoder, JsonDecoder, NEXT_PAGE_HEADER, PAGE_HEADER, PER_PAGE_HEADER, PREV_PAGE_HEADER,
    PageInfo, PaginatedResponse, TOTAL_HEADER, TOTAL_PAGES_HEADER,
};
pub use request::{Body, Request, RequestBuilder};
pub use response::Response;
pub use value::{Hash, Value};
pub use wire::{ContentType, from_json, to_json, to_query_string};

// Re-export http crate types for methods, status codes and headers
pub use http::{Method, StatusCode, header};
