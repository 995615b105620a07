//! Transfer payloads and response views
//!
//! A transfer moves a project's storage from Swift to GCP. Records returned by
//! the server carry counters for both sides; the status endpoint returns a
//! human-readable string in Portuguese.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/transfer/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCreate {
    pub project_id: String,
    pub project_name: String,
    pub environment: String,
}

impl TransferCreate {
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
            environment: environment.into(),
        }
    }
}

/// A transfer as stored by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub environment: String,

    #[serde(default)]
    pub container_count_swift: u64,
    #[serde(default)]
    pub object_count_swift: u64,
    #[serde(default)]
    pub bytes_used_swift: u64,

    /// Last object copied, empty until the transfer starts
    #[serde(default)]
    pub last_object: String,
    #[serde(default)]
    pub count_error: u64,

    #[serde(default)]
    pub container_count_gcp: u64,
    #[serde(default)]
    pub object_count_gcp: u64,
    #[serde(default)]
    pub bytes_used_gcp: u64,

    #[serde(default)]
    pub initial_date: Option<String>,
    #[serde(default)]
    pub final_date: Option<String>,
}

/// Classification of the status string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    NotInitialized,
    Completed,
    Waiting,
    InProgress,
    /// A string this client does not know
    Unknown,
}

impl TransferState {
    /// Status string as the server writes it
    pub fn server_text(&self) -> Option<&'static str> {
        match self {
            TransferState::NotInitialized => Some(STATUS_NOT_INITIALIZED),
            TransferState::Completed => Some(STATUS_COMPLETED),
            TransferState::Waiting => Some(STATUS_WAITING),
            TransferState::InProgress => Some(STATUS_IN_PROGRESS),
            TransferState::Unknown => None,
        }
    }

    /// Map a server status string, falling back to `Unknown`
    pub fn from_server_text(text: &str) -> Self {
        match text {
            STATUS_NOT_INITIALIZED => TransferState::NotInitialized,
            STATUS_COMPLETED => TransferState::Completed,
            STATUS_WAITING => TransferState::Waiting,
            STATUS_IN_PROGRESS => TransferState::InProgress,
            _ => TransferState::Unknown,
        }
    }
}

impl std::fmt::Display for TransferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferState::NotInitialized => write!(f, "not initialized"),
            TransferState::Completed => write!(f, "completed"),
            TransferState::Waiting => write!(f, "waiting"),
            TransferState::InProgress => write!(f, "in progress"),
            TransferState::Unknown => write!(f, "unknown"),
        }
    }
}

pub const STATUS_NOT_INITIALIZED: &str = "Migração não inicializada";
pub const STATUS_COMPLETED: &str = "Migração concluída";
pub const STATUS_WAITING: &str = "Aguardando migração";
pub const STATUS_IN_PROGRESS: &str = "Migrando";

/// Body of `GET /v1/transfer/status/{project_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferStatus {
    pub status: String,
    /// Percentage, only present while migrating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl TransferStatus {
    pub fn state(&self) -> TransferState {
        TransferState::from_server_text(&self.status)
    }
}

/// Body of `GET /v1/transfer/status?page=..&per_page=..`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPage {
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
    pub total: u64,
    #[serde(default)]
    pub items: Vec<TransferRecord>,
}
