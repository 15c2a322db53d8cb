//! Report endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::ApiJson;
use crate::models::{GeneratedReport, ReportConfig};
use crate::{ApiError, ApiResult, AppState};

fn not_found(report_id: &str) -> ApiError {
    ApiError::NotFound(format!("Report not found: {}", report_id))
}

/// POST /api/reports/generate
pub async fn generate_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(config): ApiJson<ReportConfig>,
) -> ApiResult<Json<ApiResponse<GeneratedReport>>> {
    let report = state.reports.generate(&principal.user_id, config)?;
    Ok(Json(
        ApiResponse::ok(report).with_message("Report generated successfully"),
    ))
}

/// GET /api/reports/:report_id
pub async fn get_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(report_id): Path<String>,
) -> ApiResult<Json<ApiResponse<GeneratedReport>>> {
    let report = state
        .reports
        .get(&principal.user_id, &report_id)
        .ok_or_else(|| not_found(&report_id))?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/reports/:report_id/download
pub async fn download_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(report_id): Path<String>,
) -> ApiResult<Response> {
    let report = state
        .reports
        .download(&principal.user_id, &report_id)
        .ok_or_else(|| not_found(&report_id))?;

    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, report.config.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response())
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports/generate", post(generate_report))
        .route("/api/reports/:report_id", get(get_report))
        .route("/api/reports/:report_id/download", get(download_report))
}
