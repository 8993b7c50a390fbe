//! JSON body decoding middleware.

use serde_json::Value;

use crate::{ChainFuture, Error, Middleware, Next, Reply, RequestOptions};

/// Replaces the downstream [`Reply::Response`] with its decoded body.
///
/// Responses without data (204) or with a blank body become `Value::Null`
/// rather than a parse failure, so a `DELETE` answered with 204 still yields a
/// reply. Replies that are already decoded pass through. Register it last so
/// that every other middleware still sees the response.
///
/// # Errors
///
/// Any other body that is not valid JSON fails with [`Error::Parse`].
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, middleware::JsonDecode};
///
/// let client = Client::builder().middleware(JsonDecode).build()?;
/// let post: Post = client.get("/posts/1", RequestOptions::new()).await?.into_json()?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecode;

impl Middleware for JsonDecode {
    fn process(&self, options: RequestOptions, next: Next) -> ChainFuture {
        Box::pin(async move {
            let response = match next.run(options).await? {
                Reply::Response(response) => response,
                data @ Reply::Data(_) => return Ok(data),
            };

            if !response.has_data() || response.text().trim().is_empty() {
                return Ok(Reply::Data(Value::Null));
            }

            serde_json::from_str(response.text())
                .map(Reply::Data)
                .map_err(|e| Error::parse(e.to_string()))
        })
    }
}
