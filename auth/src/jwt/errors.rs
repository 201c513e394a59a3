use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is malformed: {0}")]
    TokenMalformed(String),

    /// Signature verified, but the claims are missing, mistyped or not yet valid.
    #[error("Token claims are invalid: {0}")]
    ClaimsInvalid(String),

    #[error("Token is expired")]
    TokenExpired,
}
