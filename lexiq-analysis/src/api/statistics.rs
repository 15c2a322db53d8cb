//! Usage statistics endpoint

use axum::{extract::State, routing::get, Extension, Json, Router};

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use crate::services::UsageStatistics;
use crate::AppState;

/// GET /api/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<UsageStatistics>> {
    Json(ApiResponse::ok(state.usage.statistics(&principal.user_id)))
}

pub fn statistics_routes() -> Router<AppState> {
    Router::new().route("/api/statistics", get(get_statistics))
}
