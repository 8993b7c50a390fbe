//! Bearer token authentication middleware.
//!
//! This middleware adds an `Authorization: Bearer <token>` header to every
//! request passing through it.

use std::sync::Arc;

use crate::{ChainFuture, Middleware, Next, RequestOptions};

/// Middleware that adds bearer token authentication to requests.
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, middleware::BearerAuth};
///
/// let client = Client::builder()
///     .middleware(BearerAuth::new("my-secret-token"))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: Arc<str>,
}

impl BearerAuth {
    /// Create a new bearer auth middleware with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }
}

impl Middleware for BearerAuth {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        next.run(options.header("Authorization", format!("Bearer {}", self.token)))
    }
}
