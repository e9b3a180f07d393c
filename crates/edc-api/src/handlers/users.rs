//! User administration handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use edc_core::traits::Id;
use edc_models::{NewUser, UpdateUser};
use edc_services::users::{
    get_user as find_user, list_users as all_users, CreateUserService, DeleteUserService,
    UpdateUserService,
};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};
use crate::representers::UserRepresentation;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let users = all_users(&state.services, &*user).await?;
    Ok(Json(users.iter().map(UserRepresentation::from).collect::<Vec<_>>()))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let found = find_user(&state.services, &*user, id).await?;
    Ok(Json(UserRepresentation::from(found)))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(params): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let created = CreateUserService::new(&state.services, &*user)
        .call(params)
        .await
        .into_result()?;
    Ok((StatusCode::CREATED, Json(UserRepresentation::from(created))))
}

/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(params): Json<UpdateUser>,
) -> ApiResult<impl IntoResponse> {
    let updated = UpdateUserService::new(&state.services, &*user)
        .call(id, params)
        .await
        .into_result()?;
    Ok(Json(UserRepresentation::from(updated)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    DeleteUserService::new(&state.services, &*user)
        .call(id)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}
