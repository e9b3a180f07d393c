//! Marché API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use edc_core::traits::Id;
use edc_core::Page;
use edc_models::{CreateMarcheDto, DateKind, Milestone, UpdateMarcheDto};
use edc_services::marches::{
    get_marche as find_marche, list_marches as filter_marches, marche_phases, marche_status,
    CreateMarcheService, DocumentService, FlagsService, FlagsUpdate, MarcheFilter,
    MilestoneDateService, TrashService, UpdateMarcheService,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::UploadRequest;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser, Pagination};
use crate::representers::download_response;

/// GET /api/v1/marches
pub async fn list_marches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<MarcheFilter>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let marches = filter_marches(&state.services, &*user, &filter).await?;
    Ok(Json(Page::from_items(marches, &pagination)))
}

/// GET /api/v1/marches/:id
pub async fn get_marche(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(find_marche(&state.services, &*user, id).await?))
}

/// POST /api/v1/marches
pub async fn create_marche(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateMarcheDto>,
) -> ApiResult<impl IntoResponse> {
    let marche = CreateMarcheService::new(&state.services, &*user)
        .call(dto)
        .await
        .into_result()?;
    Ok((StatusCode::CREATED, Json(marche.view(state.services.today()))))
}

/// PATCH /api/v1/marches/:id
pub async fn update_marche(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateMarcheDto>,
) -> ApiResult<impl IntoResponse> {
    let marche = UpdateMarcheService::new(&state.services, &*user)
        .call(id, dto)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// DELETE /api/v1/marches/:id
///
/// Moves the marché to the trash; purge it from `/trash/:id`.
pub async fn delete_marche(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    TrashService::new(&state.services, &*user)
        .trash(id)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/marches/:id/status
pub async fn get_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(marche_status(&state.services, &*user, id).await?))
}

/// GET /api/v1/marches/:id/phases
pub async fn get_phases(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(marche_phases(&state.services, &*user, id).await?))
}

/// Milestone key to date; `null` clears the date
#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    pub dates: BTreeMap<String, Option<NaiveDate>>,
}

/// PUT /api/v1/marches/:id/dates/:kind
pub async fn set_dates(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, kind)): Path<(Id, DateKind)>,
    Json(request): Json<DatesRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.dates.is_empty() {
        return Err(ApiError::bad_request("No dates given"));
    }
    let mut changes = Vec::with_capacity(request.dates.len());
    for (key, date) in request.dates {
        let milestone = Milestone::parse(&key)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown milestone '{}'", key)))?;
        changes.push((milestone, date));
    }

    let marche = MilestoneDateService::new(&state.services, &*user)
        .call_many(id, kind, changes)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// PATCH /api/v1/marches/:id/flags
pub async fn update_flags(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(update): Json<FlagsUpdate>,
) -> ApiResult<impl IntoResponse> {
    let marche = FlagsService::new(&state.services, &*user)
        .call(id, update)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// PUT /api/v1/marches/:id/documents/:slot
pub async fn attach_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, slot)): Path<(Id, String)>,
    Json(upload): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    let marche = DocumentService::new(&state.services, &*user)
        .attach(id, &slot, &upload.file_name, &upload.content)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// GET /api/v1/marches/:id/documents/:slot
pub async fn download_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, slot)): Path<(Id, String)>,
) -> ApiResult<impl IntoResponse> {
    let document = DocumentService::new(&state.services, &*user)
        .download(id, &slot)
        .await?;
    download_response(&document)
}

/// DELETE /api/v1/marches/:id/documents/:slot
pub async fn remove_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, slot)): Path<(Id, String)>,
) -> ApiResult<impl IntoResponse> {
    let marche = DocumentService::new(&state.services, &*user)
        .remove(id, &slot)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}
