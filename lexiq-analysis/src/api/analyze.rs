//! Analysis endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::info;

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::ApiJson;
use crate::analysis::RequestStatus;
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::{ApiError, ApiResult, AppState};

/// Run one validated request and record it against the caller
pub(crate) async fn run_and_record(
    state: &AppState,
    principal: &Principal,
    request: AnalysisRequest,
) -> ApiResult<AnalysisResponse> {
    let response = state.analysis.analyze(request).await?;
    state.usage.record(&principal.user_id, &response);
    Ok(response)
}

/// POST /api/analyze
///
/// Responds with the bare `AnalysisResponse`, not an envelope.
pub async fn analyze_text(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(request): ApiJson<AnalysisRequest>,
) -> ApiResult<Json<AnalysisResponse>> {
    let request = request.validate()?;
    info!(
        user_id = %principal.user_id,
        language = %request.language,
        domain = %request.domain,
        "Analysis requested ({} chars)",
        request.content.chars().count()
    );
    let response = run_and_record(&state, &principal, request).await?;
    Ok(Json(response))
}

/// POST /api/analyze/batch
///
/// Every request is validated before any run starts; runs execute in order.
pub async fn analyze_batch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(requests): ApiJson<Vec<AnalysisRequest>>,
) -> ApiResult<Json<Vec<AnalysisResponse>>> {
    let max = state.settings.max_batch_size;
    if requests.len() > max {
        return Err(ApiError::Validation(format!(
            "Batch size cannot exceed {} requests",
            max
        )));
    }

    let requests = requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            request
                .validate()
                .map_err(|e| ApiError::Validation(format!("Request {}: {}", index, e)))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        responses.push(run_and_record(&state, &principal, request).await?);
    }
    info!(user_id = %principal.user_id, "Batch of {} analyses completed", responses.len());
    Ok(Json(responses))
}

/// GET /api/analyze/status/:request_id
pub async fn analysis_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Json<ApiResponse<RequestStatus>> {
    Json(ApiResponse::ok(state.analysis.get_status(&request_id)))
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze", post(analyze_text))
        .route("/api/analyze/batch", post(analyze_batch))
        .route("/api/analyze/status/:request_id", get(analysis_status))
        .route("/api/analyze/events", get(super::analysis_event_stream))
}
