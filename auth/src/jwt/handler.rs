use std::time::Duration;

use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for issuing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256) keyed by the secret given at construction.
/// Each handler owns its keys, so independently configured handlers can
/// coexist in one process.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for a user, valid from now until now + `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject_id: i64, username: &str, ttl: Duration) -> Result<String, JwtError> {
        self.encode(&Claims::for_user(subject_id, username, ttl))
    }

    /// Encode claims into a signed token.
    ///
    /// Identical claims signed with the same secret produce an identical token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked before any claim is deserialized or
    /// validated. Expiry is enforced without leeway.
    ///
    /// # Errors
    /// * `SignatureInvalid` - Signature does not match the secret, or the
    ///   header names another algorithm
    /// * `TokenExpired` - `exp` is in the past
    /// * `TokenMalformed` - Token structure or header cannot be parsed
    /// * `ClaimsInvalid` - Signature is valid but the claims cannot be
    ///   decoded or fail validation
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        // Failures past this point come from the signature or the payload.
        decode_header(token).map_err(|e| JwtError::TokenMalformed(e.to_string()))?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        JwtError::SignatureInvalid
                    }
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    ErrorKind::InvalidToken => JwtError::TokenMalformed(e.to_string()),
                    _ => JwtError::ClaimsInvalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
