use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection holding one record per candidate, keyed by candidate id.
pub const CANDIDATES_COLLECTION: &str = "candidates";
/// Collection holding pipeline-wide records such as the stage catalog.
pub const PIPELINE_COLLECTION: &str = "pipeline";
/// Record id of the stage catalog inside [`PIPELINE_COLLECTION`].
pub const CATALOG_RECORD: &str = "stages";

/// Document store the engine hydrates from and writes every mutation to.
pub trait RecordStore: Send + Sync {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError>;
    fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError>;
    fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store quota exceeded while writing {collection}/{id}")]
    QuotaExceeded { collection: String, id: String },
    #[error("stored record {collection}/{id} is malformed: {reason}")]
    Corrupt {
        collection: String,
        id: String,
        reason: String,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outbound hook for user-facing feedback (toasts in the browser client).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Feedback payload sent after every user-facing pipeline operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
