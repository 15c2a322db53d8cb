//! Feedback endpoints

use axum::{extract::State, routing::get, Extension, Json, Router};

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::ApiJson;
use crate::models::{Feedback, FeedbackData, FeedbackReceipt};
use crate::{ApiResult, AppState};

/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(data): ApiJson<FeedbackData>,
) -> ApiResult<Json<ApiResponse<FeedbackReceipt>>> {
    data.validate()?;
    let receipt = state.feedback.submit(&principal.user_id, data);
    Ok(Json(
        ApiResponse::ok(receipt).with_message("Feedback submitted successfully"),
    ))
}

/// GET /api/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<Vec<Feedback>>> {
    Json(ApiResponse::ok(state.feedback.list_for_user(&principal.user_id)))
}

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/api/feedback", get(list_feedback).post(submit_feedback))
}
