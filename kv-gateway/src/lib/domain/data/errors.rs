use thiserror::Error;

/// Error for key-value storage operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not be reached, or the session is closed.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused a single-key insert.
    #[error("Insert rejected for key {key}: {reason}")]
    InsertRejected { key: String, reason: String },

    /// The caller cancelled, or the write deadline passed, before every
    /// insert reported back.
    #[error("Storage operation cancelled: {0}")]
    Cancelled(String),

    /// A stored value or a value to store is not valid JSON.
    #[error("Invalid value for key {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Storage internal error: {0}")]
    Internal(String),
}
