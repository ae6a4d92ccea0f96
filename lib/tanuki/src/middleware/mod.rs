//! Tower middleware layers for the tanuki transport.
//!
//! Layers wrap [`crate::HyperClient`]'s inner service and see every
//! [`crate::Request`] after the engine materialized it, including the endpoint
//! template it was expanded from.
//!
//! # Example
//!
//! ```ignore
//! use tanuki::HyperClient;
//! use tanuki::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
