//! Per-user configuration endpoints

use axum::{extract::State, routing::get, Extension, Json, Router};

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::ApiJson;
use crate::models::ConfigurationData;
use crate::{ApiResult, AppState};

/// GET /api/config
pub async fn get_configuration(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<ConfigurationData>> {
    Json(ApiResponse::ok(state.user_config.get(&principal.user_id)))
}

/// PUT /api/config
pub async fn update_configuration(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(config): ApiJson<ConfigurationData>,
) -> ApiResult<Json<ApiResponse<ConfigurationData>>> {
    let config = state.user_config.update(&principal.user_id, config)?;
    Ok(Json(
        ApiResponse::ok(config).with_message("Configuration updated successfully"),
    ))
}

pub fn config_routes() -> Router<AppState> {
    Router::new().route("/api/config", get(get_configuration).put(update_configuration))
}
