//! sct-core: Core library for the Swift Cloud Tools client
//!
//! This crate provides the pieces shared by the client and the CLI:
//! - Error type
//! - Configuration management
//! - Request/response values and the `HttpTransport` trait
//! - Payloads and response views for expirer and transfer endpoints
//!
//! It does not depend on any HTTP library, so requests can be built and
//! checked without a network.

pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use http::{ApiRequest, ApiResponse, HttpTransport, Method};
pub use types::{
    ExpirerCreate, ExpirerDelete, TransferCreate, TransferPage, TransferRecord, TransferState,
    TransferStatus,
};
