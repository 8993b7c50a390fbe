//! Network transport using hyper-util and rustls.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::trace;

use crate::{
    Error, RawResponse, RequestOptions, Result, Transport, TransportFuture, config::TransportConfig,
    multipart_body, to_json,
};

/// HTTPS connector (HTTP/1.1 and HTTP/2) trusting the Mozilla root store.
fn https_connector(config: &TransportConfig) -> HttpsConnector<HttpConnector> {
    let roots: rustls::RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(config.connect_timeout));

    HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

/// [`Transport`] backed by a pooled hyper client.
///
/// `data` is sent as a JSON body; when `files` are present, `data` fields and
/// attachments are sent as `multipart/form-data`.
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, HyperTransport, TransportConfig};
/// use std::time::Duration;
///
/// let transport = HyperTransport::with_config(
///     TransportConfig::default().with_request_timeout(Duration::from_secs(5)),
/// );
/// let client = Client::builder().transport(transport).build()?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.idle_timeout)
            .pool_max_idle_per_host(config.max_idle_per_origin)
            .build(https_connector(&config));

        Self { inner, config }
    }

    /// Transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Build the hyper request: method, headers and encoded body.
    fn build_request(url: &str, options: &RequestOptions) -> Result<http::Request<Full<Bytes>>> {
        let url = url::Url::parse(url)?;

        let mut builder = http::Request::builder()
            .method(http::Method::from(options.method()))
            .uri(url.as_str());

        for (name, value) in options.headers.iter().flatten() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match (options.files.as_deref(), options.data.as_ref()) {
            (Some(files), data) if !files.is_empty() => {
                let (content_type, body) = multipart_body(data, files);
                let content_type = http::HeaderValue::from_str(&content_type)
                    .map_err(|e| Error::invalid_argument(e.to_string()))?;
                // The boundary is ours: a caller `Content-Type` must not survive.
                if let Some(headers) = builder.headers_mut() {
                    headers.insert(http::header::CONTENT_TYPE, content_type);
                }
                Some(body)
            }
            (_, Some(data)) => {
                if options.header_value("Content-Type").is_none() {
                    builder = builder.header(http::header::CONTENT_TYPE, crate::JSON_MIME);
                }
                Some(to_json(data)?)
            }
            (_, None) => None,
        };

        builder
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|e| Error::invalid_argument(e.to_string()))
    }

    /// Extract response headers as a `HashMap`.
    fn collect_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, url: String, options: RequestOptions) -> Result<RawResponse> {
        let request = Self::build_request(&url, &options)?;
        trace!(%url, "sending over hyper");

        let response = tokio::time::timeout(self.config.request_timeout, self.inner.request(request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let status = response.status();
        let headers = Self::collect_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        let raw = RawResponse::new(status.as_u16(), headers, body);
        Ok(match status.canonical_reason() {
            Some(reason) => raw.with_status_text(reason),
            None => raw,
        })
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Transport for HyperTransport {
    fn send(&self, url: String, options: RequestOptions) -> TransportFuture {
        let transport = self.clone();
        Box::pin(async move { transport.execute(url, options).await })
    }
}
