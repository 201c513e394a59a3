use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-lifetime user directory.
///
/// The map and the id counter live under one mutex so that the uniqueness
/// check, the insert and the id assignment happen as a single step.
pub struct MemoryUserRepository {
    state: Mutex<Directory>,
}

struct Directory {
    next_id: i64,
    users: HashMap<String, User>,
}

impl MemoryUserRepository {
    /// Create a directory pre-populated with `initial_users`.
    ///
    /// Identifiers are assigned from 1 in the order given. A repeated
    /// username in `initial_users` keeps its first entry.
    ///
    /// # Arguments
    /// * `initial_users` - `(username, password_hash)` pairs
    pub fn new(initial_users: Vec<(String, String)>) -> Self {
        let mut directory = Directory {
            next_id: 1,
            users: HashMap::new(),
        };

        for (username, password_hash) in initial_users {
            // Duplicates in the seed are ignored, the first entry wins.
            let _ = directory.insert(&username, password_hash);
        }

        Self {
            state: Mutex::new(directory),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Directory>, UserError> {
        self.state
            .lock()
            .map_err(|_| UserError::DatabaseError("user directory lock poisoned".to_string()))
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Directory {
    fn insert(&mut self, username: &str, password_hash: String) -> Result<UserId, UserError> {
        if self.users.contains_key(username) {
            return Err(UserError::AlreadyExists(username.to_string()));
        }

        let id = UserId(self.next_id);
        self.next_id += 1;

        self.users.insert(
            username.to_string(),
            User {
                id,
                username: username.to_string(),
                password_hash,
            },
        );

        Ok(id)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<User, UserError> {
        self.lock()?
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    async fn create(&self, username: &str, password_hash: String) -> Result<UserId, UserError> {
        self.lock()?.insert(username, password_hash)
    }
}
