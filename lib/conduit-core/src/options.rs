//! Per-call request description.
//!
//! [`RequestOptions`] is the value that travels down the middleware chain.
//! Every field is optional so that several layers of options (built-in
//! defaults, configured defaults, instance options, per-call options) can be
//! stacked with [`RequestOptions::merge`].
//!
//! # Example
//!
//! ```
//! use conduit_core::{Method, RequestOptions};
//!
//! let options = RequestOptions::new()
//!     .with_method(Method::Post)
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .with_data(serde_json::json!({"title": "hello"}));
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::{Attachment, CancellationToken, Method, Result};

/// Mutable, per-call request record.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Relative path or absolute URL.
    pub url: Option<String>,
    /// Prefix for relative URLs.
    pub base_url: Option<String>,
    /// HTTP method, `GET` when unset.
    pub method: Option<Method>,
    /// Header map. Replaced wholesale when merged, never combined key-by-key.
    pub headers: Option<HashMap<String, String>>,
    /// Request payload.
    pub data: Option<Value>,
    /// Attachments, sent as `multipart/form-data`.
    pub files: Option<Vec<Attachment>>,
    /// Ordered query parameters appended by the terminal adapter.
    pub query_parameters: Option<Vec<(String, String)>>,
    /// Cooperative cancellation signal.
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Last write wins, field by field. Nested maps are not merged: a
    /// `headers` map in `overrides` fully replaces the one in `self`.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            url: overrides.url.or(self.url),
            base_url: overrides.base_url.or(self.base_url),
            method: overrides.method.or(self.method),
            headers: overrides.headers.or(self.headers),
            data: overrides.data.or(self.data),
            files: overrides.files.or(self.files),
            query_parameters: overrides.query_parameters.or(self.query_parameters),
            cancellation: overrides.cancellation.or(self.cancellation),
        }
    }

    /// Effective method (`GET` when unset).
    #[must_use]
    pub fn method(&self) -> Method {
        self.method.unwrap_or_default()
    }

    /// URL as a string slice, empty when unset.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Header value by name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Mutable header map, created empty when absent.
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        self.headers.get_or_insert_default()
    }

    /// Returns `true` when a payload is present.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Returns `true` when attachments are present (even an empty list).
    #[must_use]
    pub fn has_files(&self) -> bool {
        self.files.is_some()
    }

    /// Set the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers_mut().insert(name.into(), value.into());
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize `value` as the payload.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        Ok(self.with_data(serde_json::to_value(value)?))
    }

    /// Add an attachment.
    #[must_use]
    pub fn file(mut self, attachment: Attachment) -> Self {
        self.files.get_or_insert_default().push(attachment);
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters
            .get_or_insert_default()
            .push((name.into(), value.into()));
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
