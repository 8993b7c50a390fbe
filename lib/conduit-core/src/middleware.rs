//! Middleware contract and chain executor.
//!
//! A [`Middleware`] receives the current [`RequestOptions`] and a [`Next`]
//! continuation standing for "the rest of the chain". It may:
//!
//! - rewrite the options and forward them with [`Next::run`],
//! - not call `next` at all and answer by itself (short-circuit),
//! - post-process whatever `next` returns.
//!
//! A [`Stack`] is an immutable snapshot of middlewares. Every call to
//! [`Stack::run`] starts its own cursor at position 0, so concurrent
//! invocations never consume each other's middlewares. The executor does no
//! error handling: an `Err` from any middleware travels back to the caller as is.
//!
//! # Example
//!
//! ```
//! use conduit_core::{Reply, RequestOptions, Stack, middleware_fn};
//!
//! # tokio_test_block(async {
//! let stack = Stack::new([
//!     middleware_fn(|options: RequestOptions, next: conduit_core::Next| {
//!         next.run(options.header("X-Trace", "1"))
//!     })
//!     .shared(),
//!     middleware_fn(|options: RequestOptions, _next| async move {
//!         Ok(Reply::Data(options.header_value("X-Trace").into()))
//!     })
//!     .shared(),
//! ]);
//! let reply = stack.run(RequestOptions::new()).await.unwrap();
//! assert_eq!(reply.into_json::<String>().unwrap(), "1");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     futures_util::FutureExt::now_or_never(f).unwrap()
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

use crate::{Error, Reply, RequestOptions, Result};

/// Future returned by every middleware.
pub type ChainFuture = BoxFuture<'static, Result<Reply>>;

/// An interceptor in the processing chain.
///
/// Implementations clone whatever state they need into the returned future.
pub trait Middleware: Send + Sync + 'static {
    /// Process `options`, optionally delegating to `next`.
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        (**self).process(options, next)
    }
}

impl<M: Middleware + ?Sized> Middleware for Box<M> {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        (**self).process(options, next)
    }
}

// ============================================================================
// Continuation
// ============================================================================

/// Continuation over the remaining middlewares of one invocation.
///
/// Cloning is cheap: the chain itself is shared, only the cursor is copied.
#[derive(Clone)]
pub struct Next {
    chain: Arc<[Arc<dyn Middleware>]>,
    cursor: usize,
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl Next {
    /// Run the rest of the chain with `options`.
    ///
    /// Fails with [`Error::ChainExhausted`] if no middleware remains: a chain
    /// must end with a terminal middleware that never forwards.
    pub fn run(self, options: RequestOptions) -> ChainFuture {
        let Some(current) = self.chain.get(self.cursor).cloned() else {
            return Box::pin(future::ready(Err(Error::ChainExhausted {
                position: self.cursor,
            })));
        };
        let next = Self {
            chain: self.chain,
            cursor: self.cursor + 1,
        };
        current.process(options, next)
    }

    /// Number of middlewares left, including the one `run` would call.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.cursor)
    }
}

// ============================================================================
// Stack
// ============================================================================

/// Ordered, immutable middleware chain.
#[derive(Clone)]
pub struct Stack {
    chain: Arc<[Arc<dyn Middleware>]>,
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("len", &self.len()).finish()
    }
}

impl Stack {
    /// Snapshot `middlewares` in order.
    pub fn new(middlewares: impl IntoIterator<Item = Arc<dyn Middleware>>) -> Self {
        Self {
            chain: middlewares.into_iter().collect(),
        }
    }

    /// Number of middlewares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if the stack has no middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Execute the chain from the first middleware with a fresh cursor.
    pub fn run(&self, options: RequestOptions) -> ChainFuture {
        Next {
            chain: Arc::clone(&self.chain),
            cursor: 0,
        }
        .run(options)
    }
}

// ============================================================================
// Closure adapter
// ============================================================================

/// Middleware built from a closure, see [`middleware_fn`].
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

impl<F> FnMiddleware<F> {
    /// Type-erase into a shareable chain element.
    pub fn shared<Fut>(self) -> Arc<dyn Middleware>
    where
        F: Fn(RequestOptions, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply>> + Send + 'static,
    {
        Arc::new(self)
    }
}

/// Adapt an async closure `(options, next) -> Result<Reply>` into a [`Middleware`].
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(RequestOptions, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    FnMiddleware { f }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(RequestOptions, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        Box::pin((self.f)(options, next))
    }
}
