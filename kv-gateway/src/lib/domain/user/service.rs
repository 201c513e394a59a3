use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for login and registration.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
}

impl<UR> CredentialService<UR>
where
    UR: UserRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User directory implementation
    /// * `authenticator` - Password hasher and token signer
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            repository,
            authenticator,
            token_ttl,
        }
    }
}

#[async_trait]
impl<UR> CredentialServicePort for CredentialService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, credentials: Credentials) -> Result<String, UserError> {
        const OP: &str = "services.auth.login";

        tracing::info!(op = OP, username = %credentials.username, "Attempting to login user");

        let user = match self.repository.find_by_username(&credentials.username).await {
            Ok(user) => user,
            Err(UserError::NotFound(_)) => {
                // Reported as bad credentials, after the same hashing cost.
                let authenticator = Arc::clone(&self.authenticator);
                let password = credentials.password;
                tokio::task::spawn_blocking(move || authenticator.reject_unknown_user(&password))
                    .await
                    .map_err(|e| {
                        UserError::Unknown(format!("Password verification task failed: {}", e))
                    })?;

                tracing::warn!(op = OP, "User not found");
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(op = OP, error = %e, "Failed to get user");
                return Err(e);
            }
        };

        let authenticator = Arc::clone(&self.authenticator);
        let token_ttl = self.token_ttl;
        let password = credentials.password;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(
                &password,
                &user.password_hash,
                user.id.as_i64(),
                &user.username,
                token_ttl,
            )
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        match result {
            Ok(result) => Ok(result.access_token),
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(op = OP, "Invalid password");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(op = OP, error = %e, "Failed to generate token");
                Err(UserError::Token(e))
            }
        }
    }

    async fn register(&self, credentials: Credentials) -> Result<UserId, UserError> {
        const OP: &str = "services.auth.register";

        let Credentials { username, password } = credentials;
        tracing::info!(op = OP, username = %username, "Attempting to register user");

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash = tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(op = OP, error = %e, "Failed to generate password hash");
                UserError::Password(e)
            })?;

        let id = self
            .repository
            .create(&username, password_hash)
            .await
            .map_err(|e| {
                match &e {
                    UserError::AlreadyExists(_) => tracing::warn!(op = OP, "User already exists"),
                    _ => tracing::error!(op = OP, error = %e, "Failed to save user"),
                }
                e
            })?;

        tracing::info!(op = OP, user_id = %id, "User registered");

        Ok(id)
    }
}
