//! Mock middleware.
//!
//! Answers matching requests with a synthetic JSON response instead of
//! forwarding them. Requests no handler matches continue down the chain.
//!
//! Synthetic responses decode with [`Decoders::shared()`] unless the mock is
//! given a registry through [`Mock::with_decoders`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{
    ChainFuture, Decoders, Error, Middleware, Next, Reply, RequestOptions, Response, Result,
};

type Matcher = Arc<dyn Fn(&RequestOptions) -> bool + Send + Sync>;
type Factory = Arc<dyn Fn(&RequestOptions) -> Value + Send + Sync>;

/// One mocked endpoint: a matcher, an optional delay and a payload factory.
///
/// # Example
///
/// ```ignore
/// use conduit::middleware::MockHandler;
/// use std::time::Duration;
///
/// let handler = MockHandler::matching(r"/users/\w+")?
///     .with_delay(Duration::from_millis(100))
///     .respond_with(|options| serde_json::json!({ "url": options.url() }));
/// ```
#[derive(Clone)]
pub struct MockHandler {
    description: String,
    matcher: Matcher,
    delay: Duration,
    status: u16,
    factory: Factory,
}

impl fmt::Debug for MockHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandler")
            .field("description", &self.description)
            .field("delay", &self.delay)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl MockHandler {
    fn with_matcher(description: String, matcher: Matcher) -> Self {
        Self {
            description,
            matcher,
            delay: Duration::ZERO,
            status: 200,
            factory: Arc::new(|_| Value::Null),
        }
    }

    /// Match requests whose URL (as given to the client, before the base URL
    /// is applied) matches `pattern`.
    pub fn matching(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::invalid_argument(format!("invalid mock pattern: {e}")))?;
        Ok(Self::with_matcher(
            pattern.to_string(),
            Arc::new(move |options| regex.is_match(options.url())),
        ))
    }

    /// Match requests accepted by `predicate`.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&RequestOptions) -> bool + Send + Sync + 'static,
    {
        Self::with_matcher("<predicate>".to_string(), Arc::new(predicate))
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer with `status` instead of 200.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Build the payload from the request options.
    #[must_use]
    pub fn respond_with<F>(mut self, factory: F) -> Self
    where
        F: Fn(&RequestOptions) -> Value + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    /// Always answer with `payload`.
    #[must_use]
    pub fn respond_json(self, payload: Value) -> Self {
        self.respond_with(move |_| payload.clone())
    }

    /// Returns `true` if this handler answers `options`.
    #[must_use]
    pub fn matches(&self, options: &RequestOptions) -> bool {
        (self.matcher)(options)
    }
}

/// Middleware answering with the first matching [`MockHandler`].
#[derive(Debug, Clone, Default)]
pub struct Mock {
    handlers: Vec<MockHandler>,
    decoders: Option<Arc<Decoders>>,
}

impl Mock {
    /// Mock without handlers: every request is forwarded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler. Handlers are tried in insertion order.
    #[must_use]
    pub fn with_handler(mut self, handler: MockHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Add a handler in place.
    pub fn add_handler(&mut self, handler: MockHandler) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Decode synthetic responses with `decoders`, typically the client's
    /// `configuration().decoders()`.
    #[must_use]
    pub fn with_decoders(mut self, decoders: Arc<Decoders>) -> Self {
        self.decoders = Some(decoders);
        self
    }

    /// Registered handlers.
    #[must_use]
    pub fn handlers(&self) -> &[MockHandler] {
        &self.handlers
    }
}

impl Middleware for Mock {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        let Some(handler) = self
            .handlers
            .iter()
            .find(|handler| handler.matches(&options))
            .cloned()
        else {
            return next.run(options);
        };

        let decoders = self.decoders.clone();
        Box::pin(async move {
            debug!(
                handler = %handler.description,
                url = options.url(),
                delay_ms = u64::try_from(handler.delay.as_millis()).unwrap_or(u64::MAX),
                "mock handler matched"
            );

            if !handler.delay.is_zero() {
                let pause = tokio::time::sleep(handler.delay);
                match &options.cancellation {
                    Some(token) => token.run_until_cancelled(pause).await?,
                    None => pause.await,
                }
            }

            let payload = (handler.factory)(&options);
            let response = Response::with_json(handler.status, &payload)?;
            Ok(Reply::Response(match decoders {
                Some(decoders) => response.with_decoders(decoders),
                None => response,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::{CancellationToken, Stack, middleware_fn};

    fn forwarded() -> Arc<dyn Middleware> {
        middleware_fn(|_options, _next| async {
            Ok(Reply::Response(Response::new(200, HashMap::new(), "network")))
        })
        .shared()
    }

    fn stack(mock: Mock) -> Stack {
        Stack::new([Arc::new(mock) as Arc<dyn Middleware>, forwarded()])
    }

    #[test]
    fn invalid_pattern() {
        let err = MockHandler::matching("(unclosed").expect_err("bad regex");
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn unmatched_requests_are_forwarded() {
        let mock = Mock::new().with_handler(
            MockHandler::matching(r"^/users/\w+$")
                .expect("regex")
                .respond_json(json!({"mocked": true})),
        );

        let reply = stack(mock)
            .run(RequestOptions::new().with_url("/posts/1"))
            .await
            .expect("reply");
        assert_eq!(reply.into_response().expect("response").text(), "network");
    }

    #[tokio::test]
    async fn first_matching_handler_wins() {
        let mock = Mock::new()
            .with_handler(
                MockHandler::when(|options| options.method() == crate::Method::Post)
                    .with_status(201)
                    .respond_json(json!({"created": true})),
            )
            .with_handler(
                MockHandler::matching("/users")
                    .expect("regex")
                    .respond_with(|options| json!({"url": options.url()})),
            );

        let reply = stack(mock.clone())
            .run(RequestOptions::new().with_url("/users/ada"))
            .await
            .expect("reply");
        let response = reply.into_response().expect("response");
        assert_eq!(response.status(), 200);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.data().expect("data"), Some(json!({"url": "/users/ada"})));

        let reply = stack(mock)
            .run(
                RequestOptions::new()
                    .with_url("/users")
                    .with_method(crate::Method::Post),
            )
            .await
            .expect("reply");
        let response = reply.into_response().expect("response");
        assert_eq!(response.status(), 201);
        assert_eq!(response.data().expect("data"), Some(json!({"created": true})));
    }

    #[tokio::test]
    async fn synthetic_responses_use_the_given_decoders() {
        let decoders = Decoders::default().with("application/json", |body| {
            Ok(json!({ "raw": body }))
        });
        let handler = MockHandler::matching("/users")
            .expect("regex")
            .respond_json(json!({"id": 7}));

        let plain = stack(Mock::new().with_handler(handler.clone()))
            .run(RequestOptions::new().with_url("/users"))
            .await
            .expect("reply")
            .into_response()
            .expect("response");
        assert_eq!(plain.data().expect("data"), Some(json!({"id": 7})));

        let custom = stack(
            Mock::new()
                .with_handler(handler)
                .with_decoders(Arc::new(decoders)),
        )
        .run(RequestOptions::new().with_url("/users"))
        .await
        .expect("reply")
        .into_response()
        .expect("response");
        assert_eq!(
            custom.data().expect("data"),
            Some(json!({"raw": r#"{"id":7}"#}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_honored() {
        let mock = Mock::new().with_handler(
            MockHandler::matching("/slow")
                .expect("regex")
                .with_delay(Duration::from_millis(100))
                .respond_json(json!("done")),
        );

        let start = tokio::time::Instant::now();
        let reply = stack(mock)
            .run(RequestOptions::new().with_url("/slow"))
            .await
            .expect("reply");

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(reply.into_json::<String>().expect("payload"), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_cancellable() {
        let mock = Mock::new().with_handler(
            MockHandler::matching("/slow")
                .expect("regex")
                .with_delay(Duration::from_secs(60)),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = stack(mock)
            .run(
                RequestOptions::new()
                    .with_url("/slow")
                    .with_cancellation(token),
            )
            .await
            .expect_err("cancelled");
        assert!(err.is_cancelled());
    }
}
