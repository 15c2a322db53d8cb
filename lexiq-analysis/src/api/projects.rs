//! Project endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};

use lexiq_common::api::types::ApiResponse;
use lexiq_common::api::Principal;

use super::ApiJson;
use crate::models::{Project, ProjectData};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(data): ApiJson<ProjectData>,
) -> ApiResult<Json<ApiResponse<Project>>> {
    data.validate()?;
    let project = state.sessions.create_project(&principal.user_id, data);
    Ok(Json(
        ApiResponse::ok(project).with_message("Project created successfully"),
    ))
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<Vec<Project>>> {
    Json(ApiResponse::ok(state.sessions.user_projects(&principal.user_id)))
}

/// GET /api/projects/:project_id
pub async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Project>>> {
    let project = state
        .sessions
        .get_project(&principal.user_id, &project_id)
        .ok_or_else(|| ApiError::NotFound(format!("Project not found: {}", project_id)))?;
    Ok(Json(ApiResponse::ok(project)))
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/:project_id", get(get_project))
}
