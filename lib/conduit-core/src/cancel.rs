//! Cooperative cancellation for in-flight requests.
//!
//! A [`CancellationToken`] is threaded through [`crate::RequestOptions`].
//! The terminal adapter and long-running middlewares (e.g. delayed mocks)
//! race their work against it; nothing forces an interceptor to honor it.

use std::future::Future;

use crate::{Error, Result};

/// Cloneable cancellation signal. All clones observe the same state.
///
/// Thin wrapper over [`tokio_util::sync::CancellationToken`] that reports
/// cancellation as [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: tokio_util::sync::CancellationToken,
}

impl From<tokio_util::sync::CancellationToken> for CancellationToken {
    fn from(inner: tokio_util::sync::CancellationToken) -> Self {
        Self { inner }
    }
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Returns `true` once [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Resolves when the token is cancelled.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Underlying `tokio-util` token, e.g. to build child tokens.
    #[must_use]
    pub fn as_tokio(&self) -> &tokio_util::sync::CancellationToken {
        &self.inner
    }

    /// Run `future` unless the token fires first.
    ///
    /// An already-cancelled token wins without polling `future`.
    pub async fn run_until_cancelled<F: Future>(&self, future: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            () = self.inner.cancelled() => Err(Error::Cancelled),
            output = future => Ok(output),
        }
    }
}
