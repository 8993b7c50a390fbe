//! URL resolution helpers used by the terminal adapter.

use crate::Result;

/// Combine a base URL with a path.
///
/// `url_or_path` is returned unchanged when it already contains a scheme
/// separator (`://`); otherwise it is appended to `base_url` (empty when absent).
///
/// ```
/// use conduit_core::combined_url;
///
/// assert_eq!(combined_url(Some("http://api.test"), "/posts/1"), "http://api.test/posts/1");
/// assert_eq!(combined_url(Some("http://api.test"), "https://other.test/x"), "https://other.test/x");
/// assert_eq!(combined_url(None, "/posts"), "/posts");
/// ```
#[must_use]
pub fn combined_url(base_url: Option<&str>, url_or_path: &str) -> String {
    if url_or_path.contains("://") {
        return url_or_path.to_string();
    }
    format!("{}{url_or_path}", base_url.unwrap_or_default())
}

/// Append encoded query parameters to `url`.
///
/// Uses `?` when `url` has no query yet and `&` otherwise. An empty parameter
/// list leaves the URL untouched.
pub fn append_query(url: &str, parameters: &[(String, String)]) -> Result<String> {
    let query = crate::to_query_string(parameters)?;
    if query.is_empty() {
        return Ok(url.to_string());
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{url}{separator}{query}"))
}
