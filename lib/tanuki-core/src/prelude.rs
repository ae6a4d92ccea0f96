//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tanuki_core::prelude::*;
//! ```

pub use crate::{
    ApiRequest, AuthProvider, BearerToken, Error, HttpClient, Method, NoAuth, OptionCollection,
    OptionField, OptionLocation, Options, PageInfo, PaginatedResponse, Request, Response,
    RestClient, RestClientExt, Result, Value,
};
