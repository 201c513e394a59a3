use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Persistent user directory backed by PostgreSQL.
///
/// Identifiers come from a `BIGSERIAL` sequence, so they increase
/// monotonically across processes.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert bootstrap accounts, leaving existing usernames untouched.
    ///
    /// # Arguments
    /// * `initial_users` - `(username, password_hash)` pairs
    pub async fn seed(&self, initial_users: &[(String, String)]) -> Result<(), UserError> {
        for (username, password_hash) in initial_users {
            sqlx::query(
                r#"
                INSERT INTO users (username, password_hash)
                VALUES ($1, $2)
                ON CONFLICT (username) DO NOTHING
                "#,
            )
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<User, UserError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match row {
            Some((id, username, password_hash)) => Ok(User {
                id: UserId(id),
                username,
                password_hash,
            }),
            None => Err(UserError::NotFound(username.to_string())),
        }
    }

    async fn create(&self, username: &str, password_hash: String) -> Result<UserId, UserError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::AlreadyExists(username.to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(UserId(id))
    }
}
