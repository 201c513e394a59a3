//! Authentication utilities library
//!
//! Provides the credential primitives used by the gateway:
//! - Password hashing (Argon2id, configurable work factor)
//! - JWT token issuance and validation (HS256)
//! - Authentication coordination
//!
//! Services define their own ports and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_work_factor(8, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use std::time::Duration;
//!
//! use auth::JwtHandler;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue(1, "admin", Duration::from_secs(3600)).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.username, "admin");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::time::Duration;
//!
//! use auth::{Authenticator, PasswordHasher};
//!
//! let auth = Authenticator::with_password_hasher(
//!     b"secret_key_at_least_32_bytes_long!",
//!     PasswordHasher::with_work_factor(8, 1, 1).unwrap(),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth
//!     .authenticate("password123", &hash, 1, "alice", Duration::from_secs(3600))
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
