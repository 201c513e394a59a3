use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::data::models::Entries;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn read(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<ReadRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<ReadResponseData>, ApiError> {
    let Json(body) = body?;

    tracing::debug!(user_id = %caller.user_id, key_count = body.keys.len(), "Read requested");

    state
        .data_service
        .read(body.keys)
        .await
        .map_err(ApiError::from)
        .map(|data| ApiSuccess::new(StatusCode::OK, ReadResponseData { data }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadRequestBody {
    keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadResponseData {
    pub data: Entries,
}
