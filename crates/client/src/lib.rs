//! sct-client: HTTP client for the Swift Cloud Tools API
//!
//! [`SctClient`] builds each request and hands back the raw
//! [`ApiResponse`](sct_core::ApiResponse); [`ReqwestTransport`] puts it on the
//! wire.

mod client;
mod transport;

pub use client::SctClient;
pub use transport::ReqwestTransport;
