//! Bundled middlewares.
//!
//! Each middleware implements [`crate::Middleware`] and is registered with
//! [`crate::ClientBuilder::middleware`] or [`crate::Client::add_middleware`].
//! Middlewares run in registration order: the first registered sees the
//! request first and the response last.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-basic-auth` | [`BasicAuth`] (pulls `base64`) |
//! | `middleware-full` | All middleware |
//!
//! # Available Middlewares
//!
//! - [`Mock`] - Answers matching requests with synthetic JSON responses
//! - [`JsonDecode`] - Turns every response into its decoded JSON body
//! - [`Logging`] - Logs requests/responses using `tracing`
//! - [`BearerAuth`] - Adds `Authorization: Bearer <token>` header
//! - `BasicAuth` - Adds `Authorization: Basic <base64>` header
//!
//! # Example
//!
//! ```ignore
//! use conduit::Client;
//! use conduit::middleware::{BearerAuth, JsonDecode, Logging};
//!
//! let client = Client::builder()
//!     .middleware(Logging::new())
//!     .middleware(BearerAuth::new("my-token"))
//!     .middleware(JsonDecode)
//!     .build()?;
//! ```

#[cfg(feature = "middleware-basic-auth")]
mod basic_auth;
mod bearer_auth;
mod json;
mod logging;
mod mock;

#[cfg(feature = "middleware-basic-auth")]
pub use basic_auth::BasicAuth;
pub use bearer_auth::BearerAuth;
pub use json::JsonDecode;
pub use logging::{LogLevel, Logging};
pub use mock::{Mock, MockHandler};
