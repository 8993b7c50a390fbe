//! HTTP response handling.
//!
//! - [`RawResponse`] is what a [`crate::Transport`] hands back: status,
//!   headers and an unread body.
//! - [`Response`] is the normalized wrapper every caller sees: `ok`,
//!   `content_type`, `has_data` and lazy, content-type driven decoding.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use conduit_core::Response;
//!
//! let mut headers = HashMap::new();
//! headers.insert("Content-Type".to_string(), "application/json; charset=utf-8".to_string());
//! let response = Response::new(200, headers, r#"{"id":1}"#);
//!
//! assert_eq!(response.content_type(), Some("application/json"));
//! assert_eq!(response.data().unwrap(), Some(serde_json::json!({"id": 1})));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Decoders, Result, decode::JSON_MIME};

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn canonical_reason(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Raw Response
// ============================================================================

/// Response as produced by a transport, body not yet read.
///
/// The body readers consume the value, so a body can be read at most once.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    status_text: String,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl RawResponse {
    /// Creates a raw response; the status text is the canonical reason phrase.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: canonical_reason(status),
            headers,
            body: body.into(),
        }
    }

    /// Override the status text.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns `true` if the header is present (case-insensitive).
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        find_header(&self.headers, name).is_some()
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Read the body as text. Invalid UTF-8 sequences are replaced.
    #[must_use]
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Read the body as JSON.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        crate::from_json(&self.body)
    }
}

// ============================================================================
// Normalized Response
// ============================================================================

/// Normalized response exposed to callers and middlewares.
///
/// Immutable once built. Decoding is deferred until [`Response::data`] (or a
/// typed variant) is called.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    status_text: String,
    ok: bool,
    headers: HashMap<String, String>,
    body: String,
    decoders: Arc<Decoders>,
}

impl Response {
    /// Build a synthetic response, e.g. from a short-circuiting middleware.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: canonical_reason(status),
            ok: (200..300).contains(&status),
            headers,
            body: body.into(),
            decoders: Decoders::shared(),
        }
    }

    /// Build a synthetic `application/json` response from a serializable payload.
    pub fn with_json<T: Serialize + ?Sized>(status: u16, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload)?;
        let headers = HashMap::from([("Content-Type".to_string(), JSON_MIME.to_string())]);
        Ok(Self::new(status, headers, body))
    }

    /// Wrap a transport response, reading its body as text.
    #[must_use]
    pub fn from_raw(raw: RawResponse, decoders: Arc<Decoders>) -> Self {
        let ok = raw.ok();
        let RawResponse {
            status,
            status_text,
            headers,
            body,
        } = raw;
        Self {
            status,
            status_text,
            ok,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
            decoders,
        }
    }

    /// Use a different decoder registry.
    #[must_use]
    pub fn with_decoders(mut self, decoders: Arc<Decoders>) -> Self {
        self.decoders = decoders;
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Transport-reported success (2xx).
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.ok
    }

    /// Negation of [`Self::ok`].
    #[must_use]
    pub const fn has_error(&self) -> bool {
        !self.ok
    }

    /// `false` exactly when the status is 204 No Content, whatever the body.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.status != 204
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// MIME type of the `Content-Type` header, parameters stripped.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
            .map(|value| value.split_once(';').map_or(value, |(mime, _)| mime).trim())
    }

    /// Raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Consume into the raw body text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.body
    }

    /// Decode the body according to its content type.
    ///
    /// Returns `Ok(None)` when there is no (or an empty) content type.
    pub fn data(&self) -> Result<Option<Value>> {
        match self.content_type() {
            None | Some("") => Ok(None),
            Some(mime) => self.decoders.decode(mime, &self.body).map(Some),
        }
    }

    /// Decode the body according to its content type into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.data()?.map(crate::from_value).transpose()
    }

    /// Parse the body as JSON regardless of the content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        crate::from_json(self.body.as_bytes())
    }
}
