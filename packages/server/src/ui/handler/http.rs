//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use yagura_shared::time::timestamp_to_rfc3339;

use crate::{
    infrastructure::dto::http::{
        ErrorResponseDto, LoginRequestDto, LoginResponseDto, StageSnapshotDto, StreamStatusDto,
        VerifyResponseDto,
    },
    ui::state::AppState,
    usecase::{LoginError, VerifyTokenError},
};

type ApiError = (StatusCode, Json<ErrorResponseDto>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponseDto {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current stream state, served to anonymous pages and the CLI `status` command
pub async fn stream_status(State(state): State<Arc<AppState>>) -> Json<StreamStatusDto> {
    let status = state.get_stream_status_usecase.execute().await;
    Json(status.into())
}

/// Broadcaster login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequestDto>,
) -> Result<Json<LoginResponseDto>, ApiError> {
    match state.login_usecase.execute(&request.password) {
        Ok(issued) => Ok(Json(LoginResponseDto {
            token: issued.token,
            expires_at: timestamp_to_rfc3339(issued.expires_at.value()),
        })),
        Err(LoginError::MissingPassword) => {
            Err(api_error(StatusCode::BAD_REQUEST, "password is required"))
        }
        Err(LoginError::InvalidPassword) => {
            tracing::warn!("Rejected login attempt with wrong password");
            Err(api_error(StatusCode::UNAUTHORIZED, "invalid password"))
        }
        Err(LoginError::Internal(reason)) => {
            tracing::error!("Failed to issue token: {}", reason);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
        }
    }
}

/// Verify a bearer token
pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponseDto>, ApiError> {
    let token = bearer_token(&headers).unwrap_or_default();

    match state.verify_token_usecase.execute(token) {
        Ok(claims) => Ok(Json(VerifyResponseDto {
            valid: true,
            role: claims.role,
            expires_at: timestamp_to_rfc3339(claims.expires_at.value()),
        })),
        Err(VerifyTokenError::MissingToken) => {
            Err(api_error(StatusCode::UNAUTHORIZED, "token is missing"))
        }
        Err(VerifyTokenError::InvalidToken) => {
            Err(api_error(StatusCode::UNAUTHORIZED, "invalid or expired token"))
        }
    }
}

/// Debug endpoint to inspect the stage (session, viewers, participant roles)
pub async fn debug_stage(State(state): State<Arc<AppState>>) -> Json<StageSnapshotDto> {
    let stage = state.get_stage_snapshot_usecase.execute().await;
    Json(StageSnapshotDto::from(&stage))
}

/// `Authorization: Bearer <token>` からトークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}
