//! Payloads and response views for the two resource groups

pub mod expirer;
pub mod transfer;

pub use expirer::{EXPIRATION_DATE_FORMAT, ExpirerCreate, ExpirerDelete, format_expiration_date};
pub use transfer::{TransferCreate, TransferPage, TransferRecord, TransferState, TransferStatus};
