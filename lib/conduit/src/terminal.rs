//! Terminal transport adapter.
//!
//! Always the last link of a chain. It never calls its continuation: it
//! resolves the final URL, hands the request to the [`Transport`] and wraps
//! the raw result into a normalized [`Response`].

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{
    ChainFuture, Decoders, Error, Middleware, Next, Reply, RequestOptions, Response, Result,
    Transport, append_query, combined_url,
};

/// Last middleware of every chain.
#[derive(Clone)]
pub struct Terminal {
    transport: Arc<dyn Transport>,
    decoders: Arc<Decoders>,
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("decoders", &self.decoders)
            .finish_non_exhaustive()
    }
}

impl Terminal {
    /// Create a terminal adapter over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, decoders: Arc<Decoders>) -> Self {
        Self {
            transport,
            decoders,
        }
    }

    /// Absolute URL for `options`: base URL applied, query parameters appended.
    pub fn resolve_url(options: &RequestOptions) -> Result<String> {
        let url = options
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::invalid_argument("url must be a non-empty string"))?;

        let url = combined_url(options.base_url.as_deref(), url);
        match options.query_parameters.as_deref() {
            Some(parameters) if !parameters.is_empty() => append_query(&url, parameters),
            _ => Ok(url),
        }
    }
}

impl Middleware for Terminal {
    fn process(&self, mut options: RequestOptions, _next: Next) -> ChainFuture {
        let transport = Arc::clone(&self.transport);
        let decoders = Arc::clone(&self.decoders);

        Box::pin(async move {
            let url = Self::resolve_url(&options)?;
            options.url = Some(url.clone());

            let method = options.method();
            debug!(%method, %url, "dispatching request");

            let cancellation = options.cancellation.clone();
            let exchange = transport.send(url, options);
            let raw = match cancellation {
                Some(token) => token.run_until_cancelled(exchange).await??,
                None => exchange.await?,
            };

            debug!(status = raw.status(), ok = raw.ok(), "transport responded");
            Ok(Reply::Response(Response::from_raw(raw, decoders)))
        })
    }
}
