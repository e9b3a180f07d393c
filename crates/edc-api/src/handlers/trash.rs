//! Trash handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_services::marches::{list_trash as trashed_marches, TrashService};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/v1/trash
pub async fn list_trash(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(trashed_marches(&state.services, &*user).await?))
}

/// POST /api/v1/trash/:id/restore
pub async fn restore(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let marche = TrashService::new(&state.services, &*user)
        .restore(id)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// DELETE /api/v1/trash/:id
pub async fn purge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    TrashService::new(&state.services, &*user)
        .purge(id)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct EmptyTrashResponse {
    pub purged: usize,
}

/// DELETE /api/v1/trash
pub async fn empty(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let purged = TrashService::new(&state.services, &*user)
        .empty()
        .await
        .into_result()?;
    Ok(Json(EmptyTrashResponse { purged }))
}
