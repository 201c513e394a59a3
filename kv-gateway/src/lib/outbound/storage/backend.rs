use async_trait::async_trait;
use serde_json::Value;

use crate::domain::data::errors::StorageError;

/// Single-key protocol operations of a key-value backend.
///
/// Implementations must be safe to call concurrently through a shared
/// reference; the gateway issues many requests over one instance at once.
#[async_trait]
pub trait KeyValueBackend: Send + Sync + 'static {
    /// Point lookup of `key`, returning at most one value.
    async fn select(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Insert `(key, value)`.
    ///
    /// # Errors
    /// * `InsertRejected` - `key` already holds a value
    /// * `Unavailable` - The request could not be completed
    async fn insert(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    /// Release the backend connection. Later calls fail with `Unavailable`.
    async fn close(&self) -> Result<(), StorageError>;
}
