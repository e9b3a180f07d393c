//! Spreadsheet import and export

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_import::{export_template, ExportService, ImportService};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_attachment(file_name: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}

/// GET /api/v1/import/template
pub async fn download_template(user: AuthenticatedUser) -> ApiResult<impl IntoResponse> {
    let body = export_template(&*user)?;
    Ok(csv_attachment("marches_template.csv", body))
}

/// POST /api/v1/projects/:id/import
///
/// The request body is the raw CSV file.
pub async fn import_marches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let report = ImportService::new(&state.services, &*user)
        .call(project_id, &body)
        .await
        .into_result()?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/projects/:id/export
pub async fn export_marches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let body = ExportService::new(&state.services, &*user)
        .project(project_id)
        .await?;
    Ok(csv_attachment(&format!("marches_{}.csv", project_id), body))
}
