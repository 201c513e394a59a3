use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use auth::JwtError;
use thiserror::Error;

use super::handlers::ApiErrorBody;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the verified caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Reasons a request is turned away at the gate. Every variant answers 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthGateError {
    #[error("auth header is missing")]
    AuthHeaderMissing,

    #[error("invalid authorization header format")]
    AuthHeaderInvalid,

    #[error("token signature is invalid")]
    TokenSignatureInvalid,

    #[error("invalid authorization token")]
    TokenInvalid,
}

impl From<JwtError> for AuthGateError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::SignatureInvalid | JwtError::TokenMalformed(_) => {
                AuthGateError::TokenSignatureInvalid
            }
            JwtError::TokenExpired | JwtError::ClaimsInvalid(_) | JwtError::EncodingFailed(_) => {
                AuthGateError::TokenInvalid
            }
        }
    }
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    let token = extract_bearer_token(req.headers())?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        AuthGateError::from(e)
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.sub),
        username: claims.username,
    });

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The header must split on single spaces into exactly two parts, the first
/// being `Bearer`.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthGateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthGateError::AuthHeaderMissing)?;

    let value = value
        .to_str()
        .map_err(|_| AuthGateError::AuthHeaderInvalid)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(AuthGateError::AuthHeaderInvalid),
    }
}
