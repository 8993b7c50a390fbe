//! Serialization helpers shared by the pipeline.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// let bytes = conduit_core::to_json(&serde_json::json!({"a": 1})).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"a":1}"#);
/// ```
pub fn to_json<T: Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Encode name/value pairs (or any serializable struct) as a query string.
///
/// Uses `serde_html_form`, so `Vec<T>` fields become repeated parameters.
///
/// ```
/// let pairs = vec![("q".to_string(), "rust lang".to_string())];
/// assert_eq!(conduit_core::to_query_string(&pairs).expect("encode"), "q=rust+lang");
/// ```
pub fn to_query_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(&value).map_err(Into::into)
}

/// Deserialize JSON bytes with path-aware error messages.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Deserialize an already-decoded JSON value into `T`, keeping path context.
pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
