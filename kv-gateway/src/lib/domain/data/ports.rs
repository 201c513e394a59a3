use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::data::errors::StorageError;
use crate::domain::data::models::Entries;

/// Port for data access operations exposed to the HTTP layer.
#[async_trait]
pub trait DataServicePort: Send + Sync + 'static {
    /// Read values for the given keys.
    ///
    /// # Returns
    /// Mapping of the keys that hold a value (missing keys are skipped without error)
    ///
    /// # Errors
    /// * `Unavailable` - A lookup failed; no partial result is returned
    async fn read(&self, keys: Vec<String>) -> Result<Entries, StorageError>;

    /// Write every pair in `data`.
    ///
    /// # Errors
    /// Any single insert failure. Pairs that were stored are kept.
    async fn write(&self, data: Entries) -> Result<(), StorageError>;
}

/// Storage gateway over a remote key-value backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Point lookup for each key, in order.
    ///
    /// # Errors
    /// * `Unavailable` - Any lookup failed; partial results are discarded
    async fn read(&self, keys: &[String]) -> Result<Entries, StorageError>;

    /// Dispatch one independent insert per pair concurrently, then join them all.
    ///
    /// There is no cross-key atomicity: inserts that succeeded stay applied
    /// even when the call fails.
    ///
    /// # Errors
    /// * The first insert failure observed
    /// * `Cancelled` - `cancel` fired, or the write deadline passed, before
    ///   every insert completed
    async fn write(&self, data: Entries, cancel: CancellationToken) -> Result<(), StorageError>;

    /// Release the backend session.
    async fn close(&self) -> Result<(), StorageError>;
}
