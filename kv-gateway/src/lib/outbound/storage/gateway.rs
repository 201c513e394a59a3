use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::backend::KeyValueBackend;
use crate::domain::data::errors::StorageError;
use crate::domain::data::models::Entries;
use crate::domain::data::ports::KeyValueStore;

/// Storage gateway translating batch reads and writes into single-key
/// backend requests.
///
/// Reads are sequential point lookups. Writes fan out one insert task per
/// key into a [`JoinSet`], so every request is in flight before the first
/// one is awaited. Inserts are never rolled back.
pub struct StorageGateway<B>
where
    B: KeyValueBackend,
{
    backend: Arc<B>,
    write_timeout: Option<Duration>,
}

impl<B> StorageGateway<B>
where
    B: KeyValueBackend,
{
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Build a gateway over a backend that is shared with other owners.
    pub fn from_arc(backend: Arc<B>) -> Self {
        Self {
            backend,
            write_timeout: None,
        }
    }

    /// Stop waiting on a write batch once `timeout` has elapsed.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Join every insert task and fold the outcomes, first failure wins.
    async fn join_inserts(
        inserts: &mut JoinSet<Result<(), StorageError>>,
    ) -> Result<(), StorageError> {
        let mut first_error = None;

        while let Some(joined) = inserts.join_next().await {
            let outcome = joined
                .map_err(|e| StorageError::Internal(format!("insert task failed: {}", e)))
                .and_then(|result| result);

            if let Err(e) = outcome {
                tracing::warn!(error = %e, "Insert failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<B> KeyValueStore for StorageGateway<B>
where
    B: KeyValueBackend,
{
    async fn read(&self, keys: &[String]) -> Result<Entries, StorageError> {
        let mut entries = Entries::with_capacity(keys.len());

        for key in keys {
            match self.backend.select(key).await {
                Ok(Some(value)) => {
                    entries.insert(key.clone(), value);
                }
                Ok(None) => {}
                // Partial results are dropped rather than returned.
                Err(StorageError::Unavailable(reason)) => {
                    return Err(StorageError::Unavailable(reason));
                }
                Err(e) => {
                    return Err(StorageError::Unavailable(format!(
                        "lookup of key {} failed: {}",
                        key, e
                    )));
                }
            }
        }

        Ok(entries)
    }

    async fn write(&self, data: Entries, cancel: CancellationToken) -> Result<(), StorageError> {
        if data.is_empty() {
            return Ok(());
        }

        let key_count = data.len();
        let mut inserts = JoinSet::new();

        for (key, value) in data {
            let backend = Arc::clone(&self.backend);
            inserts.spawn(async move { backend.insert(&key, &value).await });
        }

        tracing::debug!(key_count, "Dispatched inserts");

        let write_timeout = self.write_timeout;
        let deadline = async move {
            match write_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        // Dropping `inserts` on an early return aborts the local tasks; the
        // backend may still apply requests that were already sent.
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                Err(StorageError::Cancelled("write cancelled by caller".to_string()))
            }
            _ = deadline => {
                Err(StorageError::Cancelled(format!(
                    "write deadline of {:?} elapsed",
                    write_timeout.unwrap_or_default()
                )))
            }
            result = Self::join_inserts(&mut inserts) => result,
        }
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.backend.close().await
    }
}
