//! reqwest-backed transport
//!
//! Sends an [`ApiRequest`] exactly as built and returns the status code and
//! full body. HTTP error statuses are responses, not errors.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sct_core::{ApiRequest, ApiResponse, Error, HttpTransport, Method, Result};

/// Transport over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::General(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Wrap an already configured client (proxies, custom TLS roots, ...)
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Errors name the offending header, never its value.
    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }

    fn map_send_error(error: reqwest::Error) -> Error {
        if error.is_builder() {
            Error::InvalidUrl(error.to_string())
        } else {
            Error::Network(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let headers = Self::header_map(&request.headers)?;
        let mut builder = self
            .inner
            .request(Self::method(request.method), &request.url)
            .headers(headers);

        // reqwest accepts a body on DELETE as on any other method
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::map_send_error)?;
        let status = response.status().as_u16();
        let content = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))?;

        Ok(ApiResponse::new(status, content))
    }
}
