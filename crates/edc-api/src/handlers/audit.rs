//! Audit log handler

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use edc_audit::AuditQuery;
use edc_services::audit::read_audit;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/v1/audit
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<AuditQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(read_audit(&state.services, &*user, &query).await?))
}
