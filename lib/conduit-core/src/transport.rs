//! Transport boundary.
//!
//! The terminal adapter hands the resolved URL and the final options to a
//! [`Transport`] and expects a [`RawResponse`] back. Non-2xx statuses are
//! regular responses; only transport-level failures (DNS, refused
//! connection, TLS, timeout) are errors.

use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;

use crate::{RawResponse, RequestOptions, Result};

/// Future returned by a [`Transport`].
pub type TransportFuture = BoxFuture<'static, Result<RawResponse>>;

/// Performs the actual network exchange.
pub trait Transport: Send + Sync + 'static {
    /// Send a request to the absolute `url` described by `options`.
    fn send(&self, url: String, options: RequestOptions) -> TransportFuture;
}

/// Transport built from a closure, see [`transport_fn`].
#[derive(Clone)]
pub struct FnTransport<F> {
    f: F,
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}

/// Adapt an async closure `(url, options) -> Result<RawResponse>` into a [`Transport`].
///
/// Handy for tests and for plugging in a foreign HTTP stack.
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(String, RequestOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RawResponse>> + Send + 'static,
{
    FnTransport { f }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, RequestOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RawResponse>> + Send + 'static,
{
    fn send(&self, url: String, options: RequestOptions) -> TransportFuture {
        Box::pin((self.f)(url, options))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Method;

    #[tokio::test]
    async fn closure_transport() {
        let transport = transport_fn(|url, options: RequestOptions| async move {
            let body = format!("{} {url}", options.method());
            Ok(RawResponse::new(200, HashMap::new(), body))
        });

        let raw = transport
            .send(
                "http://api.test/posts".to_string(),
                RequestOptions::new().with_method(Method::Put),
            )
            .await
            .expect("response");

        assert_eq!(raw.text(), "PUT http://api.test/posts");
    }
}
