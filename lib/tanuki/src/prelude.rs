//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tanuki::prelude::*;
//! ```

pub use crate::{
    ApiClient, ApiRequest, AuthProvider, BearerToken, ClientConfig, Error, Hash, HttpClient,
    HyperClient, Method, OptionCollection, OptionEnum, OptionField, OptionLocation, Options,
    PageInfo, PaginatedResponse, Request, Response, RestClient, RestClientExt, Result,
    StatusCode, Value,
};
pub use serde::{Deserialize, Serialize};
