//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;

use crate::Error;

/// HTTP request method accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[default]
    #[display("GET")]
    Get,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
}

impl Method {
    /// All supported methods.
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::Head,
        Self::Delete,
        Self::Patch,
        Self::Post,
        Self::Put,
    ];

    /// Returns `true` if a request body (`data`) may be sent.
    #[must_use]
    pub const fn allows_data(&self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }

    /// Returns `true` if attachments (`files`) may be sent.
    #[must_use]
    pub const fn allows_files(&self) -> bool {
        matches!(self, Self::Patch | Self::Post | Self::Put)
    }

    /// Returns `true` if the method is safe (does not modify resources).
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.to_string() == s)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "method can be one of GET, HEAD, DELETE, PATCH, POST, PUT, got \"{s}\""
                ))
            })
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Head => Self::HEAD,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
        }
    }
}
