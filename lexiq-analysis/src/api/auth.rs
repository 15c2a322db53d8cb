//! Authentication endpoints and middleware
//!
//! Protected routes require `Authorization: Bearer <token>`. When auth is
//! disabled in configuration every request runs as the anonymous principal.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::{parse_bearer, Principal};

use super::ApiJson;
use crate::models::UserSession;
use crate::services::LoginGrant;
use crate::{ApiError, ApiResult, AppState};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Resolve the bearer token into a [`Principal`] request extension
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !state.settings.auth_enabled {
        request.extensions_mut().insert(Principal::anonymous());
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = parse_bearer(header).map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let principal = state.auth.resolve(&token).ok_or_else(|| {
        debug!("Rejected unknown or expired token");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginGrant>>> {
    let grant = state
        .auth
        .login(&credentials.username, &credentials.password)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;
    Ok(Json(ApiResponse::ok(grant).with_message("Login successful")))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<Value>> {
    if !principal.token.is_empty() {
        state.auth.logout(&principal.token);
    }
    Json(ApiResponse::message("Logout successful"))
}

/// GET /auth/session
pub async fn current_session(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiResponse<UserSession>>> {
    let session = state
        .auth
        .session(&principal.token)
        .ok_or_else(|| ApiError::NotFound("No active session".to_string()))?;
    Ok(Json(ApiResponse::ok(session)))
}

/// Public login route
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Routes that need an authenticated principal
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
}
