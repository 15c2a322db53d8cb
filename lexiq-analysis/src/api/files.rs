//! File upload and retrieval endpoints

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::analyze::run_and_record;
use crate::models::{AnalysisOptions, AnalysisRequest, AnalysisResponse, ProcessedFile};
use crate::services::FileUpload;
use crate::{ApiError, ApiResult, AppState};

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::Validation(err.body_text())
    }
}

/// POST /api/files/upload
///
/// Multipart form with a `file` part and optional `file_type` and
/// `project_id` text parts.
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<ProcessedFile>>> {
    let mut upload: Option<FileUpload> = None;
    let mut project_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(FileUpload {
                    filename,
                    mime_type,
                    bytes: bytes.to_vec(),
                    project_id: None,
                });
            }
            Some("project_id") => {
                let value = field.text().await.map_err(multipart_error)?;
                if !value.trim().is_empty() {
                    project_id = Some(value.trim().to_string());
                }
            }
            // `file_type` is accepted but the stored type comes from the filename
            _ => {
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    let mut upload =
        upload.ok_or_else(|| ApiError::Validation("Missing 'file' field".to_string()))?;

    if let Some(id) = &project_id {
        if state.sessions.get_project(&principal.user_id, id).is_none() {
            return Err(ApiError::NotFound(format!("Project not found: {}", id)));
        }
    }
    upload.project_id = project_id.clone();

    let processed = state
        .files
        .process_upload(&principal.user_id, upload)
        .await?;
    if let Some(id) = &project_id {
        state.sessions.record_project_file(id);
    }

    info!(
        user_id = %principal.user_id,
        file_id = %processed.file.file_id,
        "File uploaded ({} bytes)",
        processed.file.file_size
    );
    Ok(Json(
        ApiResponse::ok(processed).with_message("File uploaded and processed successfully"),
    ))
}

/// GET /api/files/:file_id
pub async fn get_file(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(file_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ProcessedFile>>> {
    let file = state
        .files
        .get(&principal.user_id, &file_id)
        .ok_or_else(|| ApiError::NotFound(format!("File not found: {}", file_id)))?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/:file_id
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(file_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    state.files.delete(&principal.user_id, &file_id).await?;
    Ok(Json(ApiResponse::message("File deleted successfully")))
}

/// Optional body of `POST /api/files/:file_id/analyze`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileAnalysisParams {
    pub language: Option<String>,
    pub domain: Option<String>,
    pub options: Option<AnalysisOptions>,
}

/// POST /api/files/:file_id/analyze
///
/// Analyzes the file's extracted text. The body is optional.
pub async fn analyze_file(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(file_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<AnalysisResponse>>> {
    let params: FileAnalysisParams = if body.iter().all(u8::is_ascii_whitespace) {
        FileAnalysisParams::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?
    };

    let file = state
        .files
        .get(&principal.user_id, &file_id)
        .ok_or_else(|| ApiError::NotFound(format!("File not found: {}", file_id)))?;

    let mut request = AnalysisRequest::new(file.content.unwrap_or_default());
    if let Some(language) = params.language {
        request = request.with_language(language);
    }
    if let Some(domain) = params.domain {
        request = request.with_domain(domain);
    }
    if let Some(options) = params.options {
        request = request.with_options(options);
    }
    let request = request.validate()?;

    let response = run_and_record(&state, &principal, request).await?;
    if let Some(project_id) = &file.file.project_id {
        state.sessions.record_project_analysis(project_id);
    }
    Ok(Json(
        ApiResponse::ok(response).with_message("File analyzed successfully"),
    ))
}

/// Build file routes
pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/api/files/upload", post(upload_file))
        .route("/api/files/:file_id", get(get_file).delete(delete_file))
        .route("/api/files/:file_id/analyze", post(analyze_file))
}
