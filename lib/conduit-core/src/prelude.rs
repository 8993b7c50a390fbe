//! Prelude module for convenient imports.
//!
//! ```ignore
//! use conduit_core::prelude::*;
//! ```

pub use crate::{
    Attachment, CancellationToken, Error, Method, Middleware, Next, Reply, RequestOptions,
    Response, Result, Stack, Transport, middleware_fn,
};
