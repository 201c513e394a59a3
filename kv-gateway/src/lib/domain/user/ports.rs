use async_trait::async_trait;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for credential and token operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `credentials` - Username and plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `DatabaseError` - Directory lookup failed
    /// * `Token` - Token generation failed
    async fn login(&self, credentials: Credentials) -> Result<String, UserError>;

    /// Register a new user.
    ///
    /// # Arguments
    /// * `credentials` - Username and plaintext password
    ///
    /// # Returns
    /// Identifier assigned to the new user
    ///
    /// # Errors
    /// * `AlreadyExists` - Username is already taken
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Directory write failed
    async fn register(&self, credentials: Credentials) -> Result<UserId, UserError>;
}

/// User directory: persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `DatabaseError` - Lookup failed
    async fn find_by_username(&self, username: &str) -> Result<User, UserError>;

    /// Store a new user and assign it an identifier.
    ///
    /// Never overwrites an existing record.
    ///
    /// # Returns
    /// Identifier greater than every identifier assigned before
    ///
    /// # Errors
    /// * `AlreadyExists` - Username is already taken
    /// * `DatabaseError` - Write failed
    async fn create(&self, username: &str, password_hash: String) -> Result<UserId, UserError>;
}
