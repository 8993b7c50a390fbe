//! Basic authentication middleware.
//!
//! This middleware adds an `Authorization: Basic <base64(user:pass)>` header
//! to every request passing through it.

use std::sync::Arc;

use base64::Engine;

use crate::{ChainFuture, Middleware, Next, RequestOptions};

/// Middleware that adds basic authentication to requests.
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, middleware::BasicAuth};
///
/// let client = Client::builder()
///     .middleware(BasicAuth::new("username", "password"))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct BasicAuth {
    /// Base64-encoded "username:password".
    encoded_credentials: Arc<str>,
}

impl BasicAuth {
    /// Create a new basic auth middleware with the given username and password.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self {
            encoded_credentials: Arc::from(encoded),
        }
    }
}

impl Middleware for BasicAuth {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        next.run(options.header(
            "Authorization",
            format!("Basic {}", self.encoded_credentials),
        ))
    }
}
