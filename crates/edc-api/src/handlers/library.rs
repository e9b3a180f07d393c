//! Document library handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_models::{CreateLibraryDocumentDto, LibraryCategory};
use edc_services::library::{
    download_library_document, get_library_document, list_library, CreateLibraryDocumentService,
    DeleteLibraryDocumentService,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};
use crate::representers::{download_response, LibraryEntry};

#[derive(Debug, Default, Deserialize)]
pub struct LibraryFilter {
    pub category: Option<LibraryCategory>,
}

/// GET /api/v1/library
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<LibraryFilter>,
) -> ApiResult<impl IntoResponse> {
    let docs = list_library(&state.services, &*user, filter.category).await?;
    Ok(Json(docs.iter().map(LibraryEntry::from).collect::<Vec<_>>()))
}

/// GET /api/v1/library/:id
pub async fn get_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let doc = get_library_document(&state.services, &*user, id).await?;
    Ok(Json(LibraryEntry::from(&doc)))
}

/// GET /api/v1/library/:id/download
pub async fn download_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let document = download_library_document(&state.services, &*user, id).await?;
    download_response(&document)
}

/// POST /api/v1/library
pub async fn create_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateLibraryDocumentDto>,
) -> ApiResult<impl IntoResponse> {
    let doc = CreateLibraryDocumentService::new(&state.services, &*user)
        .call(dto)
        .await
        .into_result()?;
    Ok((StatusCode::CREATED, Json(LibraryEntry::from(&doc))))
}

/// DELETE /api/v1/library/:id
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    DeleteLibraryDocumentService::new(&state.services, &*user)
        .call(id)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}
