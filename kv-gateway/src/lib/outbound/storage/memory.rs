use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::backend::KeyValueBackend;
use crate::domain::data::errors::StorageError;

/// In-process key-value backend.
///
/// Shares the insert-if-absent contract of the Cassandra backend, which makes
/// it a drop-in for local runs and tests.
#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<String, Value>>,
    closed: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Unavailable("storage is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn select(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.ensure_open()?;

        Ok(self.records.read().await.get(key).cloned())
    }

    async fn insert(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.ensure_open()?;

        let mut records = self.records.write().await;
        if records.contains_key(key) {
            return Err(StorageError::InsertRejected {
                key: key.to_string(),
                reason: "duplicate key exists".to_string(),
            });
        }

        records.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_insert_then_select() {
        let backend = MemoryBackend::new();

        backend.insert("a", &json!({"x": 1})).await.unwrap();

        assert_eq!(backend.select("a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(backend.select("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_existing_key_keeps_first_value() {
        let backend = MemoryBackend::new();

        backend.insert("a", &json!(1)).await.unwrap();
        let result = backend.insert("a", &json!(2)).await;

        assert!(matches!(result, Err(StorageError::InsertRejected { ref key, .. }) if key == "a"));
        assert_eq!(backend.select("a").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_null_value_is_stored() {
        let backend = MemoryBackend::new();

        backend.insert("nothing", &Value::Null).await.unwrap();

        assert_eq!(backend.select("nothing").await.unwrap(), Some(Value::Null));
    }

    #[tokio::test]
    async fn test_closed_backend_rejects_requests() {
        let backend = MemoryBackend::new();
        backend.insert("a", &json!(1)).await.unwrap();

        backend.close().await.unwrap();

        assert!(matches!(
            backend.select("a").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            backend.insert("b", &json!(2)).await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_of_same_key_admit_one() {
        let backend = std::sync::Arc::new(MemoryBackend::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let backend = std::sync::Arc::clone(&backend);
            handles.push(tokio::spawn(async move {
                backend.insert("contended", &json!(i)).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 1);
    }
}
