//! File attachments and `multipart/form-data` encoding.
//!
//! Requests carrying `files` are sent as a multipart body: every field of an
//! object-shaped `data` payload becomes a text part, followed by one part per
//! [`Attachment`].

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::Value;

/// A file (or raw binary field) attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    field: String,
    filename: Option<String>,
    content_type: String,
    bytes: Bytes,
}

impl Attachment {
    /// Binary attachment without a filename.
    #[must_use]
    pub fn new(field: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            field: field.into(),
            filename: None,
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.into(),
        }
    }

    /// File attachment; the content type is guessed from the extension.
    #[must_use]
    pub fn file(
        field: impl Into<String>,
        filename: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        Self {
            field: field.into(),
            content_type: content_type_for(&filename).to_string(),
            filename: Some(filename),
            bytes: bytes.into(),
        }
    }

    /// Override the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Form field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// File name, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type of the part.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw content.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => "application/json",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Encode `data` and `files` as a multipart body with a fresh boundary.
///
/// Returns the `Content-Type` header value and the encoded body.
#[must_use]
pub fn multipart_body(data: Option<&Value>, files: &[Attachment]) -> (String, Bytes) {
    multipart_body_with_boundary(&generate_boundary(), data, files)
}

/// Same as [`multipart_body`] with a caller-chosen boundary.
#[must_use]
pub fn multipart_body_with_boundary(
    boundary: &str,
    data: Option<&Value>,
    files: &[Attachment],
) -> (String, Bytes) {
    let mut body = BytesMut::new();

    match data {
        None | Some(Value::Null) => {}
        Some(Value::Object(fields)) => {
            for (name, value) in fields {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                write_part(&mut body, boundary, name, None, None, text.as_bytes());
            }
        }
        Some(other) => {
            let json = other.to_string();
            write_part(
                &mut body,
                boundary,
                "data",
                None,
                Some("application/json"),
                json.as_bytes(),
            );
        }
    }

    for file in files {
        write_part(
            &mut body,
            boundary,
            &file.field,
            file.filename.as_deref(),
            Some(&file.content_type),
            &file.bytes,
        );
    }

    body.put_slice(format!("--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        body.freeze(),
    )
}

fn write_part(
    body: &mut BytesMut,
    boundary: &str,
    name: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    content: &[u8],
) {
    body.put_slice(format!("--{boundary}\r\n").as_bytes());
    match filename {
        Some(filename) => body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        ),
        None => body.put_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
        ),
    }
    if let Some(content_type) = content_type {
        body.put_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.put_slice(b"\r\n");
    body.put_slice(content);
    body.put_slice(b"\r\n");
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("----conduit{nanos:x}")
}
