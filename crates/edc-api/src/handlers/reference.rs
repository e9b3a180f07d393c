//! Reference data handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use edc_models::RegistryKind;
use edc_services::reference::{get_registry, list_registries, ReferenceDataService};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

fn registry_kind(kind: &str) -> ApiResult<RegistryKind> {
    RegistryKind::parse(kind)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown reference registry '{}'", kind)))
}

/// GET /api/v1/reference
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(list_registries(&state.services, &*user).await?))
}

/// GET /api/v1/reference/:kind
pub async fn get_one(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(kind): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let kind = registry_kind(&kind)?;
    Ok(Json(get_registry(&state.services, &*user, kind).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddValueRequest {
    pub value: String,
}

/// POST /api/v1/reference/:kind
pub async fn add_value(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(kind): Path<String>,
    Json(request): Json<AddValueRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = registry_kind(&kind)?;
    let registry = ReferenceDataService::new(&state.services, &*user)
        .add(kind, &request.value)
        .await
        .into_result()?;
    Ok(Json(registry))
}

#[derive(Debug, Deserialize)]
pub struct RenameValueRequest {
    pub from: String,
    pub to: String,
}

/// PATCH /api/v1/reference/:kind
pub async fn rename_value(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(kind): Path<String>,
    Json(request): Json<RenameValueRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = registry_kind(&kind)?;
    let registry = ReferenceDataService::new(&state.services, &*user)
        .rename(kind, &request.from, &request.to)
        .await
        .into_result()?;
    Ok(Json(registry))
}

/// DELETE /api/v1/reference/:kind/:value
pub async fn remove_value(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((kind, value)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let kind = registry_kind(&kind)?;
    let registry = ReferenceDataService::new(&state.services, &*user)
        .remove(kind, &value)
        .await
        .into_result()?;
    Ok(Json(registry))
}
