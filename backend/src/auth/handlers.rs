//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup, login, token
//! refresh and logout, and delegate the business logic to `auth::service`.

use crate::api::common::ApiError;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::services::user_service::SignupRequest;
use crate::utils::jwt::TokenCodec;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle self-registration
#[axum::debug_handler]
pub async fn signup(
    Extension(pool): Extension<SqlitePool>,
    Extension(codec): Extension<TokenCodec>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, ResponseJson<AuthResponse>), ApiError> {
    let auth_service = AuthService::new(&pool, &codec);

    let response = auth_service.signup(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(response)))
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(codec): Extension<TokenCodec>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let auth_service = AuthService::new(&pool, &codec);

    let response = auth_service.login(payload).await?;
    Ok(ResponseJson(response))
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(codec): Extension<TokenCodec>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<RefreshTokenResponse>, ApiError> {
    let auth_service = AuthService::new(&pool, &codec);

    let response = auth_service.refresh_token(payload).await?;
    Ok(ResponseJson(response))
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<serde_json::Value> {
    // Tokens are stateless; logout is handled on the client side by
    // discarding the pair. The server can maintain a blacklist if we later
    // need enhanced security.
    ResponseJson(serde_json::json!({
        "message": "Logged out successfully"
    }))
}
