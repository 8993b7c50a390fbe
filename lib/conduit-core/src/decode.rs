//! Content-type driven body decoding.
//!
//! A [`Decoders`] registry maps a MIME type to a decoding function. It is
//! consulted lazily, when a caller asks a [`crate::Response`] for its data,
//! never while the response is being built.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

use crate::{Error, Result};

/// MIME type of JSON bodies.
pub const JSON_MIME: &str = "application/json";

/// Decoding function: raw body text to a JSON value.
pub type DecodeFn = dyn Fn(&str) -> Result<Value> + Send + Sync;

static DEFAULT_DECODERS: LazyLock<Arc<Decoders>> = LazyLock::new(|| Arc::new(Decoders::default()));

/// Registry of body decoders keyed by MIME type (case-insensitive).
#[derive(Clone)]
pub struct Decoders {
    by_mime: HashMap<String, Arc<DecodeFn>>,
}

impl fmt::Debug for Decoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mimes: Vec<_> = self.by_mime.keys().collect();
        mimes.sort();
        f.debug_struct("Decoders").field("mimes", &mimes).finish()
    }
}

impl Default for Decoders {
    /// Registry with the `application/json` decoder.
    fn default() -> Self {
        Self::empty().with(JSON_MIME, decode_json)
    }
}

impl Decoders {
    /// Registry without any decoder.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_mime: HashMap::new(),
        }
    }

    /// Shared default registry.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&DEFAULT_DECODERS)
    }

    /// Register (or replace) the decoder for `mime`.
    pub fn register<F>(&mut self, mime: impl AsRef<str>, decoder: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.by_mime
            .insert(mime.as_ref().trim().to_ascii_lowercase(), Arc::new(decoder));
        self
    }

    /// Builder-style [`Self::register`].
    #[must_use]
    pub fn with<F>(mut self, mime: impl AsRef<str>, decoder: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(mime, decoder);
        self
    }

    /// Returns `true` if a decoder handles `mime`.
    #[must_use]
    pub fn supports(&self, mime: &str) -> bool {
        self.by_mime.contains_key(&mime.trim().to_ascii_lowercase())
    }

    /// Decode `body` with the decoder registered for `mime`.
    pub fn decode(&self, mime: &str, body: &str) -> Result<Value> {
        let decoder = self
            .by_mime
            .get(&mime.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::unsupported_content_type(mime))?;
        decoder(body)
    }
}

fn decode_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn json_is_registered_by_default() {
        let decoders = Decoders::default();
        check!(decoders.supports("application/json"));
        check!(decoders.supports("Application/JSON"));
        check!(!decoders.supports("text/plain"));

        let value = decoders.decode(JSON_MIME, r#"{"id":1}"#).expect("decode");
        check!(value == serde_json::json!({"id": 1}));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let_assert!(Err(err) = Decoders::default().decode(JSON_MIME, "{"));
        check!(err.is_parse());
        check!(err.to_string().starts_with("response body can't be parsed"));
    }

    #[test]
    fn unknown_mime_is_unsupported() {
        let_assert!(Err(Error::UnsupportedContentType(mime)) =
            Decoders::default().decode("text/html", "<p>"));
        check!(mime == "text/html");
    }

    #[test]
    fn custom_decoder() {
        let decoders = Decoders::empty().with("text/plain", |body| Ok(Value::String(body.into())));

        check!(decoders.decode("text/plain", "hi").expect("decode") == Value::from("hi"));
        check!(decoders.decode(JSON_MIME, "{}").is_err());
    }

    #[test]
    fn debug_lists_mimes() {
        let debug = format!("{:?}", Decoders::default());
        check!(debug.contains("application/json"));
    }
}
