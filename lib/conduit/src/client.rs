//! Pipeline client: options merging, verb validation and chain construction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future;
use serde_json::Value;
use tower_service::Service;
use tracing::trace;

use crate::{
    Attachment, ChainFuture, Error, Method, Middleware, Reply, RequestOptions, Result, Stack,
    Transport, config::ClientConfiguration, terminal::Terminal,
};

#[cfg(feature = "hyper-transport")]
use crate::{HyperTransport, config::TransportConfig};

/// HTTP client running every request through its middleware chain.
///
/// The chain is the registered middlewares, in registration order, followed
/// by the terminal adapter that calls the [`Transport`].
///
/// # Example
///
/// ```ignore
/// use conduit::Client;
///
/// let client = Client::with_base_url("https://jsonplaceholder.typicode.com")?;
/// let reply = client.get("/posts/1", RequestOptions::new()).await?;
/// let post = reply.into_response()?.data()?;
/// ```
#[derive(Clone)]
pub struct Client {
    configuration: ClientConfiguration,
    options: RequestOptions,
    middlewares: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("configuration", &self.configuration)
            .field("options", &self.options)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with the default transport and configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client resolving relative URLs against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Client configuration.
    #[must_use]
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    /// Instance-level options, merged after the configuration defaults.
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Number of registered middlewares (the terminal adapter excluded).
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Update the configuration in place.
    ///
    /// ```ignore
    /// client.configure(|config| {
    ///     config.with_base_url("http://api.test");
    /// });
    /// ```
    pub fn configure<F>(&mut self, update: F) -> &mut Self
    where
        F: FnOnce(&mut ClientConfiguration),
    {
        update(&mut self.configuration);
        self
    }

    /// Replace the instance-level options.
    pub fn set_options(&mut self, options: RequestOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Append a middleware to the chain.
    pub fn add_middleware<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Layer built-in defaults, configured defaults, instance options and
    /// `options`, then set the URL.
    #[must_use]
    pub fn merged_options(&self, url: impl Into<String>, options: RequestOptions) -> RequestOptions {
        ClientConfiguration::defaults()
            .merge(self.configuration.options().clone())
            .merge(self.options.clone())
            .merge(options)
            .with_url(url)
    }

    /// Snapshot of the current chain, terminal adapter included.
    #[must_use]
    pub fn stack(&self) -> Stack {
        let terminal: Arc<dyn Middleware> = Arc::new(Terminal::new(
            Arc::clone(&self.transport),
            Arc::clone(self.configuration.decoders()),
        ));
        Stack::new(
            self.middlewares
                .iter()
                .cloned()
                .chain(std::iter::once(terminal)),
        )
    }

    /// Run `url` with `options` through the chain, without verb validation.
    pub fn fetch(&self, url: impl Into<String>, options: RequestOptions) -> ChainFuture {
        let options = self.merged_options(url, options);
        trace!(method = %options.method(), url = options.url(), "running chain");
        self.stack().run(options)
    }

    /// Validate and run a request.
    ///
    /// `data` and `files` override the ones carried by `options`. Validation
    /// failures are returned before any middleware runs.
    pub fn request(
        &self,
        method: &str,
        url: impl Into<String>,
        data: Option<Value>,
        files: Option<Vec<Attachment>>,
        options: RequestOptions,
    ) -> ChainFuture {
        match Self::validated(method, url.into(), data, files, options) {
            Ok((url, options)) => self.fetch(url, options),
            Err(err) => Box::pin(future::ready(Err(err))),
        }
    }

    fn validated(
        method: &str,
        url: String,
        data: Option<Value>,
        files: Option<Vec<Attachment>>,
        mut options: RequestOptions,
    ) -> Result<(String, RequestOptions)> {
        let method = Method::from_str(method)?;
        if url.is_empty() {
            return Err(Error::invalid_argument("url must be a non-empty string"));
        }

        if data.is_some() {
            options.data = data;
        }
        if files.is_some() {
            options.files = files;
        }

        if !method.allows_data() && (options.has_data() || options.has_files()) {
            return Err(Error::invalid_argument(format!(
                "{method} requests can't have data or files"
            )));
        }
        if !method.allows_files() && options.has_files() {
            return Err(Error::invalid_argument(format!(
                "{method} requests can't have files"
            )));
        }

        Ok((url, options.with_method(method)))
    }

    /// `GET url`.
    pub fn get(&self, url: impl Into<String>, options: RequestOptions) -> ChainFuture {
        self.request("GET", url, None, None, options)
    }

    /// `HEAD url`.
    pub fn head(&self, url: impl Into<String>, options: RequestOptions) -> ChainFuture {
        self.request("HEAD", url, None, None, options)
    }

    /// `DELETE url`, with an optional body.
    pub fn delete(
        &self,
        url: impl Into<String>,
        data: Option<Value>,
        options: RequestOptions,
    ) -> ChainFuture {
        self.request("DELETE", url, data, None, options)
    }

    /// `PATCH url`, with an optional body and attachments.
    pub fn patch(
        &self,
        url: impl Into<String>,
        data: Option<Value>,
        files: Option<Vec<Attachment>>,
        options: RequestOptions,
    ) -> ChainFuture {
        self.request("PATCH", url, data, files, options)
    }

    /// `POST url`, with an optional body and attachments.
    pub fn post(
        &self,
        url: impl Into<String>,
        data: Option<Value>,
        files: Option<Vec<Attachment>>,
        options: RequestOptions,
    ) -> ChainFuture {
        self.request("POST", url, data, files, options)
    }

    /// `PUT url`, with an optional body and attachments.
    pub fn put(
        &self,
        url: impl Into<String>,
        data: Option<Value>,
        files: Option<Vec<Attachment>>,
        options: RequestOptions,
    ) -> ChainFuture {
        self.request("PUT", url, data, files, options)
    }
}

/// The client as a tower service: the request URL is taken from the options.
impl Service<RequestOptions> for Client {
    type Response = Reply;
    type Error = Error;
    type Future = ChainFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, options: RequestOptions) -> Self::Future {
        let url = options.url.clone().unwrap_or_default();
        self.fetch(url, options)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Client`].
///
/// # Example
///
/// ```ignore
/// use conduit::{Client, middleware::JsonDecode};
/// use std::time::Duration;
///
/// let client = Client::builder()
///     .base_url("https://api.example.com")
///     .header("Accept", "application/json")
///     .timeout(Duration::from_secs(5))
///     .middleware(JsonDecode)
///     .build()?;
/// ```
pub struct ClientBuilder {
    base_url: Option<String>,
    configuration: ClientConfiguration,
    options: RequestOptions,
    middlewares: Vec<Arc<dyn Middleware>>,
    transport: Option<Arc<dyn Transport>>,
    #[cfg(feature = "hyper-transport")]
    transport_config: TransportConfig,
    default_transport: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            configuration: ClientConfiguration::default(),
            options: RequestOptions::default(),
            middlewares: Vec::new(),
            transport: None,
            #[cfg(feature = "hyper-transport")]
            transport_config: TransportConfig::default(),
            default_transport: true,
        }
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("configuration", &self.configuration)
            .field("middlewares", &self.middlewares.len())
            .field("has_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Set the base URL. It must be absolute (with a scheme).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.with_header(name, value);
        self
    }

    /// Set the default method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.configuration.with_method(method);
        self
    }

    /// Set the instance-level options.
    #[must_use]
    pub fn default_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a body decoder for `mime`.
    #[must_use]
    pub fn decoder<F>(mut self, mime: impl AsRef<str>, decoder: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.configuration.register_decoder(mime, decoder);
        self
    }

    /// Append a middleware. First added runs first.
    #[must_use]
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Use a custom transport.
    #[must_use]
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Do not fall back to the bundled transport.
    #[must_use]
    pub fn without_default_transport(mut self) -> Self {
        self.default_transport = false;
        self
    }

    /// Configure the bundled hyper transport.
    #[cfg(feature = "hyper-transport")]
    #[must_use]
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Set the request timeout of the bundled hyper transport.
    #[cfg(feature = "hyper-transport")]
    #[must_use]
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.transport_config.request_timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// Fails with [`Error::InvalidUrl`] if the base URL is not absolute, and
    /// with [`Error::Configuration`] if no transport is available.
    #[cfg_attr(not(feature = "hyper-transport"), allow(unused_variables))]
    pub fn build(self) -> Result<Client> {
        let Self {
            base_url,
            mut configuration,
            options,
            middlewares,
            transport,
            #[cfg(feature = "hyper-transport")]
            transport_config,
            default_transport,
        } = self;

        if let Some(base_url) = base_url {
            url::Url::parse(&base_url)?;
            configuration.with_base_url(base_url);
        }

        let transport = match transport {
            Some(transport) => transport,
            #[cfg(feature = "hyper-transport")]
            None if default_transport => Arc::new(HyperTransport::with_config(transport_config)),
            None => return Err(Error::configuration("no transport available")),
        };

        Ok(Client {
            configuration,
            options,
            middlewares,
            transport,
        })
    }
}
