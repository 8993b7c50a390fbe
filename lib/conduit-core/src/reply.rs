//! Chain output.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Response, Result};

/// Value produced by a middleware chain.
///
/// The terminal adapter (and most short-circuiting middlewares) produce a
/// [`Reply::Response`]. A middleware that post-processes the result of its
/// continuation may replace it with the decoded body, [`Reply::Data`].
#[derive(Debug, Clone)]
pub enum Reply {
    /// A normalized response.
    Response(Response),
    /// A decoded body.
    Data(Value),
}

impl Reply {
    /// Borrow the response, if this reply still holds one.
    #[must_use]
    pub const fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Data(_) => None,
        }
    }

    /// Take the response; fails with [`Error::UnexpectedReply`] for decoded data.
    pub fn into_response(self) -> Result<Response> {
        match self {
            Self::Response(response) => Ok(response),
            Self::Data(_) => Err(Error::UnexpectedReply),
        }
    }

    /// Deserialize the reply: the JSON body of a response, or the decoded data.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Response(response) => response.json(),
            Self::Data(value) => crate::from_value(value),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn response_reply() {
        let reply = Reply::from(Response::new(200, HashMap::new(), r#"{"id":1}"#));
        assert!(reply.as_response().is_some());

        let value: Value = reply.clone().into_json().expect("json");
        assert_eq!(value, serde_json::json!({"id": 1}));
        assert_eq!(reply.into_response().expect("response").status(), 200);
    }

    #[test]
    fn data_reply() {
        let reply = Reply::from(serde_json::json!({"id": 2}));
        assert!(reply.as_response().is_none());

        let value: Value = reply.clone().into_json().expect("json");
        assert_eq!(value["id"], 2);
        assert!(matches!(reply.into_response(), Err(Error::UnexpectedReply)));
    }
}
