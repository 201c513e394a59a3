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

pub async fn write(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<WriteRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<WriteResponseData>, ApiError> {
    let Json(body) = body?;

    tracing::debug!(user_id = %caller.user_id, key_count = body.data.len(), "Write requested");

    state
        .data_service
        .write(body.data)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                WriteResponseData {
                    status: "success".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteRequestBody {
    data: Entries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResponseData {
    pub status: String,
}
