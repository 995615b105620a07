//! Expiring-object payloads
//!
//! An expiration record is identified by (account, container, object). The
//! date travels as a plain string; the server is the only validator.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

/// Date layout the expirer endpoint accepts
pub const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body of `POST /v1/expirer/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirerCreate {
    pub account: String,
    pub container: String,
    pub object: String,
    /// `YYYY-MM-DD HH:MM:SS`, sent as given
    pub date: String,
}

impl ExpirerCreate {
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        object: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            object: object.into(),
            date: date.into(),
        }
    }
}

/// Body of `DELETE /v1/expirer/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirerDelete {
    pub account: String,
    pub container: String,
    pub object: String,
}

impl ExpirerDelete {
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            object: object.into(),
        }
    }
}

/// Render a civil datetime the way the expirer endpoint expects it
pub fn format_expiration_date(datetime: &DateTime) -> String {
    datetime.strftime(EXPIRATION_DATE_FORMAT).to_string()
}
