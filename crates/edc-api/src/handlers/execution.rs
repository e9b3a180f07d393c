//! Execution record handlers
//!
//! Every route answers with the updated marché.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_models::{Avenant, ContractRef, Decompte};
use edc_services::marches::{ExecutionService, TerminationRequest};
use serde::Deserialize;

use super::UploadRequest;
use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// PUT /api/v1/marches/:id/execution/contract
pub async fn set_contract(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(contract): Json<ContractRef>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .set_contract(id, contract)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// POST /api/v1/marches/:id/execution/deliveries
pub async fn add_delivery_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(upload): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .add_delivery_document(id, &upload.file_name, &upload.content)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// POST /api/v1/marches/:id/execution/decomptes
pub async fn add_decompte(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(decompte): Json<Decompte>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .add_decompte(id, decompte)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub paye: bool,
}

/// PATCH /api/v1/marches/:id/execution/decomptes/:numero
pub async fn set_decompte_paid(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, numero)): Path<(Id, u32)>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .set_decompte_paid(id, numero, request.paye)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// DELETE /api/v1/marches/:id/execution/decomptes/:numero
pub async fn remove_decompte(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, numero)): Path<(Id, u32)>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .remove_decompte(id, numero)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// POST /api/v1/marches/:id/execution/avenants
pub async fn add_avenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(avenant): Json<Avenant>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .add_avenant(id, avenant)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// DELETE /api/v1/marches/:id/execution/avenants/:numero
pub async fn remove_avenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, numero)): Path<(Id, u32)>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .remove_avenant(id, numero)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}

/// POST /api/v1/marches/:id/execution/termination
pub async fn advance_termination(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(request): Json<TerminationRequest>,
) -> ApiResult<impl IntoResponse> {
    let marche = ExecutionService::new(&state.services, &*user)
        .advance_termination(id, request)
        .await
        .into_result()?;
    Ok(Json(marche.view(state.services.today())))
}
