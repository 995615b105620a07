//! Request and response values exchanged with the transport
//!
//! A request is built completely before it reaches the wire, which keeps URL,
//! header and body construction testable without a server. The response is the
//! raw status code and body; nothing here interprets either.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Header carrying the request media type
pub const CONTENT_TYPE_HEADER: &str = "Content-type";

/// Header carrying the API key
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Media type sent on every request
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON text, already serialized
    pub body: Option<String>,
}

impl ApiRequest {
    /// Create a request carrying the standard JSON and auth headers
    pub fn new(method: Method, url: impl Into<String>, api_key: &str) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![
                (
                    CONTENT_TYPE_HEADER.to_string(),
                    JSON_CONTENT_TYPE.to_string(),
                ),
                (AUTH_TOKEN_HEADER.to_string(), api_key.to_string()),
            ],
            body: None,
        }
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response handed back to callers
///
/// The status code and body are exactly what the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status_code: u16,
    content: Bytes,
}

impl ApiResponse {
    pub fn new(status_code: u16, content: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            content: content.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw body bytes
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the body into a typed value
    ///
    /// This is opt-in: the client never decodes on its own, and a non-2xx
    /// body (plain text or HTML) will usually fail to decode.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }

    /// Decode the body into an untyped JSON value
    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }

    pub fn into_parts(self) -> (u16, Bytes) {
        (self.status_code, self.content)
    }
}

/// Sends a built request and returns the raw response
///
/// Implementations must send a body on any method that carries one,
/// DELETE included, and must return non-2xx responses as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
