//! HTTP request pipeline with composable async middlewares.
//!
//! Every request goes through an ordered chain of [`Middleware`]s followed
//! by a terminal adapter that calls the [`Transport`] and normalizes the
//! result into a [`Response`]. Middlewares may rewrite the request, answer
//! by themselves, or post-process what the rest of the chain returns.
//!
//! # Example
//!
//! ```ignore
//! use conduit::prelude::*;
//! use conduit::middleware::{JsonDecode, Logging};
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! let client = Client::builder()
//!     .base_url("https://jsonplaceholder.typicode.com")
//!     .middleware(Logging::new())
//!     .middleware(JsonDecode)
//!     .build()?;
//!
//! let post: Post = client.get("/posts/1", RequestOptions::new()).await?.into_json()?;
//! ```

mod client;
mod config;
pub mod middleware;
pub mod prelude;
mod terminal;
#[cfg(feature = "hyper-transport")]
mod transport;

// Re-export client types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfiguration, TransportConfig};
pub use terminal::Terminal;
#[cfg(feature = "hyper-transport")]
pub use transport::HyperTransport;

// Re-export core types
pub use conduit_core::{
    Attachment, CancellationToken, ChainFuture, DecodeFn, Decoders, Error, FnMiddleware,
    FnTransport, JSON_MIME, Method, Middleware, Next, RawResponse, Reply, RequestOptions,
    Response, Result, Stack, Transport, TransportFuture, append_query, combined_url, from_json,
    from_value, middleware_fn, multipart_body, multipart_body_with_boundary, to_json,
    to_query_string, transport_fn,
};

// Re-export http types for status codes and headers
pub use conduit_core::{StatusCode, header};
