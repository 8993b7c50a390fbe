//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions for
//! easy glob importing:
//!
//! ```ignore
//! use conduit::prelude::*;
//! ```

pub use crate::{
    Attachment, CancellationToken, Client, ClientBuilder, ClientConfiguration, Error, Method,
    Middleware, Next, Reply, RequestOptions, Response, Result, StatusCode, Transport,
    middleware_fn,
};
pub use serde::{Deserialize, Serialize};
