//! Project API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_core::Page;
use edc_models::{CreateProjectDto, UpdateProjectDto};
use edc_services::projects::{
    get_project as find_project, list_projects as all_projects, summarize_project,
    CreateProjectService, DeleteProjectService, SignedPlanService, UpdateProjectService,
};

use super::UploadRequest;
use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Pagination};
use crate::representers::download_response;

/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let projects = all_projects(&state.services, &*user).await?;
    Ok(Json(Page::from_items(projects, &pagination)))
}

/// GET /api/v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(find_project(&state.services, &*user, id).await?))
}

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = CreateProjectService::new(&state.services, &*user)
        .call(dto)
        .await
        .into_result()?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/v1/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = UpdateProjectService::new(&state.services, &*user)
        .call(id, dto)
        .await
        .into_result()?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    DeleteProjectService::new(&state.services, &*user)
        .call(id)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/:id/summary
pub async fn project_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(summarize_project(&state.services, &*user, id).await?))
}

/// PUT /api/v1/projects/:id/plan
pub async fn attach_signed_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(upload): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    let project = SignedPlanService::new(&state.services, &*user)
        .attach(id, &upload.file_name, &upload.content)
        .await
        .into_result()?;
    Ok(Json(project))
}

/// GET /api/v1/projects/:id/plan
pub async fn download_signed_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let plan = SignedPlanService::new(&state.services, &*user).download(id).await?;
    download_response(&plan)
}

/// DELETE /api/v1/projects/:id/plan
pub async fn remove_signed_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = SignedPlanService::new(&state.services, &*user)
        .remove(id)
        .await
        .into_result()?;
    Ok(Json(project))
}
