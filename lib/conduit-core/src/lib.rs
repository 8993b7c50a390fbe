//! Core types and traits for the conduit HTTP pipeline.
//!
//! This crate provides the building blocks used by `conduit`:
//! - [`RequestOptions`] - per-call request description
//! - [`Method`] - supported HTTP methods
//! - [`RawResponse`], [`Response`] and [`Reply`] - transport output, normalized response, chain output
//! - [`Decoders`] - content-type driven body decoding
//! - [`Middleware`], [`Next`] and [`Stack`] - middleware contract and chain executor
//! - [`Transport`] - boundary to the network
//! - [`Error`] and [`Result`] - error handling
//! - [`CancellationToken`] - cooperative cancellation

mod attachment;
mod cancel;
mod codec;
mod decode;
mod error;
mod method;
mod middleware;
mod options;
pub mod prelude;
mod reply;
mod resolve;
mod response;
mod transport;

pub use attachment::{Attachment, multipart_body, multipart_body_with_boundary};
pub use cancel::CancellationToken;
pub use codec::{from_json, from_value, to_json, to_query_string};
pub use decode::{DecodeFn, Decoders, JSON_MIME};
pub use error::{Error, Result};
pub use method::Method;
pub use middleware::{ChainFuture, FnMiddleware, Middleware, Next, Stack, middleware_fn};
pub use options::RequestOptions;
pub use reply::Reply;
pub use resolve::{append_query, combined_url};
pub use response::{RawResponse, Response};
pub use transport::{FnTransport, Transport, TransportFuture, transport_fn};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
