//! Client and transport configuration types.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::{Decoders, Method, RequestOptions, Result};

// ============================================================================
// Client Configuration
// ============================================================================

/// Defaults applied to every request of one [`crate::Client`].
///
/// Mutated through [`crate::Client::configure`] or the builder, never while
/// requests are in flight.
#[derive(Debug, Clone, Default)]
pub struct ClientConfiguration {
    options: RequestOptions,
    decoders: Arc<Decoders>,
}

impl ClientConfiguration {
    /// Built-in defaults: `GET` with `Accept: application/json`.
    #[must_use]
    pub fn defaults() -> RequestOptions {
        RequestOptions::new()
            .with_method(Method::Get)
            .header("Accept", "application/json")
    }

    /// Configured default options (without the built-in defaults).
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Configured base URL.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.options.base_url.as_deref()
    }

    /// Body decoders handed to every response.
    #[must_use]
    pub fn decoders(&self) -> &Arc<Decoders> {
        &self.decoders
    }

    /// Set the base URL prepended to relative request URLs.
    pub fn with_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.options.base_url = Some(base_url.into());
        self
    }

    /// Set the default method.
    pub fn with_method(&mut self, method: Method) -> &mut Self {
        self.options.method = Some(method);
        self
    }

    /// Set a default header.
    ///
    /// Configured headers replace the built-in `Accept` header as a whole:
    /// re-add it here if it is still wanted.
    pub fn with_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.headers_mut().insert(name.into(), value.into());
        self
    }

    /// Replace the default headers.
    pub fn with_headers(&mut self, headers: HashMap<String, String>) -> &mut Self {
        self.options.headers = Some(headers);
        self
    }

    /// Register a body decoder for `mime`.
    pub fn register_decoder<F>(&mut self, mime: impl AsRef<str>, decoder: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.decoders).register(mime, decoder);
        self
    }
}

// ============================================================================
// Transport Configuration
// ============================================================================

/// Socket-level settings of [`HyperTransport`](crate::HyperTransport).
///
/// The request timeout stops at the response head; reading the body and time
/// spent in middlewares are not covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Deadline for the response head, fails with a timeout error.
    pub request_timeout: Duration,
    /// Deadline for the TCP connect.
    pub connect_timeout: Duration,
    /// Pooled keep-alive connections kept per origin.
    pub max_idle_per_origin: usize,
    /// How long a pooled connection may stay unused.
    pub idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_idle_per_origin: 32,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Override the response-head deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the TCP connect deadline.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// A zero value disables connection reuse.
    #[must_use]
    pub const fn with_max_idle_per_origin(mut self, max: usize) -> Self {
        self.max_idle_per_origin = max;
        self
    }

    /// Override how long pooled connections stay open unused.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}
