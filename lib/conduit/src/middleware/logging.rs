//! Request/response logging middleware.
//!
//! This middleware logs requests and their outcome using the `tracing` crate.

use std::time::Instant;

use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{ChainFuture, Middleware, Next, Reply, RequestOptions};

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request details, headers included).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// Middleware logging every request passing through it.
///
/// Everything downstream runs inside an `http_request` span.
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, middleware::Logging};
///
/// let client = Client::builder().middleware(Logging::new()).build()?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging {
    level: LogLevel,
}

impl Logging {
    /// Create a logging middleware with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging middleware that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Middleware for Logging {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        let method = options.method();
        let url = options.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(
                            method = %method,
                            url = %url,
                            headers = ?options.headers,
                            "sending request"
                        );
                    }
                    LogLevel::Info => {
                        info!(method = %method, url = %url, "sending request");
                    }
                }

                let result = next.run(options).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(Reply::Response(response)) => {
                        let status = response.status();
                        if response.ok() {
                            info!(status, elapsed_ms, "request completed");
                        } else {
                            warn!(status, elapsed_ms, "request failed with HTTP error");
                        }
                    }
                    Ok(Reply::Data(_)) => {
                        info!(elapsed_ms, "request completed with decoded data");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
