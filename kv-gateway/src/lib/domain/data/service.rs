use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::data::errors::StorageError;
use crate::domain::data::models::Entries;
use crate::domain::data::ports::DataServicePort;
use crate::domain::data::ports::KeyValueStore;

/// Domain service for reading and writing key-value data.
///
/// Writes are issued under a child of `cancel`, so cancelling the parent
/// token abandons every write still waiting on the backend.
pub struct DataService<S>
where
    S: KeyValueStore,
{
    store: Arc<S>,
    cancel: CancellationToken,
}

impl<S> DataService<S>
where
    S: KeyValueStore,
{
    /// Create a new data service.
    ///
    /// # Arguments
    /// * `store` - Storage gateway implementation
    /// * `cancel` - Parent token for in-flight writes
    pub fn new(store: Arc<S>, cancel: CancellationToken) -> Self {
        Self { store, cancel }
    }
}

#[async_trait]
impl<S> DataServicePort for DataService<S>
where
    S: KeyValueStore,
{
    async fn read(&self, keys: Vec<String>) -> Result<Entries, StorageError> {
        const OP: &str = "services.data.read";

        tracing::info!(op = OP, key_count = keys.len(), "Reading data");

        let entries = self.store.read(&keys).await.map_err(|e| {
            tracing::error!(op = OP, error = %e, "Failed reading data");
            e
        })?;

        tracing::debug!(op = OP, found = entries.len(), "Read complete");

        Ok(entries)
    }

    async fn write(&self, data: Entries) -> Result<(), StorageError> {
        const OP: &str = "services.data.write";

        tracing::info!(op = OP, key_count = data.len(), "Writing data");

        self.store
            .write(data, self.cancel.child_token())
            .await
            .map_err(|e| {
                tracing::error!(op = OP, error = %e, "Failed writing data");
                e
            })
    }
}
