use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scylla::frame::response::result::CqlValue;
use scylla::prepared_statement::PreparedStatement;
use scylla::Session;
use scylla::SessionBuilder;
use serde_json::Value;
use tokio::sync::RwLock;

use super::backend::KeyValueBackend;
use crate::config::StorageConfig;
use crate::domain::data::errors::StorageError;

/// Open session plus the statements prepared against it.
struct Connection {
    session: Session,
    select: PreparedStatement,
    insert: PreparedStatement,
}

/// Key-value backend over a Cassandra/Scylla cluster.
///
/// One multiplexed session serves every request. Values are stored as JSON
/// text; inserts are lightweight transactions so an existing key is never
/// overwritten.
pub struct CassandraBackend {
    connection: RwLock<Option<Arc<Connection>>>,
}

impl CassandraBackend {
    /// Connect to the cluster and make sure the keyspace and table exist.
    ///
    /// # Errors
    /// * `Unavailable` - No session within `connect_timeout_ms`, or schema
    ///   setup failed
    /// * `Internal` - Keyspace or table name is not a plain identifier
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        ensure_identifier(&config.keyspace)?;
        ensure_identifier(&config.table)?;

        let connect_timeout = config.connect_timeout();

        let session = tokio::time::timeout(
            connect_timeout,
            SessionBuilder::new()
                .known_nodes(&config.nodes)
                .connection_timeout(connect_timeout)
                .build(),
        )
        .await
        .map_err(|_| {
            StorageError::Unavailable(format!(
                "no session to {:?} within {:?}",
                config.nodes, connect_timeout
            ))
        })?
        .map_err(|e| StorageError::Unavailable(format!("failed to open session: {}", e)))?;

        session
            .query(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {}
                    WITH REPLICATION = {{
                        'class': 'SimpleStrategy',
                        'replication_factor': 1
                    }}",
                    config.keyspace
                ),
                &[],
            )
            .await
            .map_err(schema_error)?;

        let table = format!("{}.{}", config.keyspace, config.table);

        session
            .query(
                format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        key text PRIMARY KEY,
                        value text
                    )",
                    table
                ),
                &[],
            )
            .await
            .map_err(schema_error)?;

        let select = session
            .prepare(format!("SELECT value FROM {} WHERE key = ? LIMIT 1", table))
            .await
            .map_err(schema_error)?;

        let insert = session
            .prepare(format!(
                "INSERT INTO {} (key, value) VALUES (?, ?) IF NOT EXISTS",
                table
            ))
            .await
            .map_err(schema_error)?;

        tracing::info!(nodes = ?config.nodes, table = %table, "Connected to storage cluster");

        Ok(Self {
            connection: RwLock::new(Some(Arc::new(Connection {
                session,
                select,
                insert,
            }))),
        })
    }

    async fn connection(&self) -> Result<Arc<Connection>, StorageError> {
        self.connection
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| StorageError::Unavailable("storage session is closed".to_string()))
    }
}

#[async_trait]
impl KeyValueBackend for CassandraBackend {
    async fn select(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let connection = self.connection().await?;

        let result = connection
            .session
            .execute(&connection.select, (key,))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let row = result
            .maybe_first_row_typed::<(Option<String>,)>()
            .map_err(|e| StorageError::Internal(format!("unexpected row shape: {}", e)))?;

        match row {
            Some((Some(text),)) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::InvalidValue {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            _ => Ok(None),
        }
    }

    async fn insert(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let connection = self.connection().await?;

        let text = serde_json::to_string(value).map_err(|e| StorageError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let result = connection
            .session
            .execute(&connection.insert, (key, text))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        // Conditional inserts answer with an `[applied]` flag in the first column.
        let applied = result
            .first_row()
            .ok()
            .and_then(|row| row.columns.into_iter().next().flatten())
            .and_then(|column| CqlValue::as_boolean(&column));

        match applied {
            Some(true) => Ok(()),
            Some(false) => Err(StorageError::InsertRejected {
                key: key.to_string(),
                reason: "duplicate key exists".to_string(),
            }),
            None => Err(StorageError::Internal(format!(
                "insert of key {} returned no applied flag",
                key
            ))),
        }
    }

    async fn close(&self) -> Result<(), StorageError> {
        // Requests already holding the connection finish on it; the session
        // shuts down when the last of them drops it.
        if self.connection.write().await.take().is_some() {
            tracing::info!("Storage session closed");
        }
        Ok(())
    }
}

fn schema_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Unavailable(format!("schema setup failed: {}", e))
}

fn ensure_identifier(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::Internal(format!(
            "{:?} is not a valid keyspace or table name",
            name
        )))
    }
}
