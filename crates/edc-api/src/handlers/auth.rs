//! Sign-in and the current account

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use edc_services::auth::{ChangePasswordService, LoginService};
use edc_services::users::get_user;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};
use crate::representers::UserRepresentation;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserRepresentation,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = LoginService::new(&state.services, &state.jwt)
        .call(&request.email, &request.password)
        .await
        .into_result()?;

    Ok(Json(TokenResponse {
        token: session.token,
        token_type: "Bearer",
        expires_in: session.expires_in,
        user: session.user.into(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let account = get_user(&state.services, &*user, user.id).await?;
    Ok(Json(UserRepresentation::from(account)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/v1/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    ChangePasswordService::new(&state.services, &*user)
        .call(&request.current_password, &request.new_password)
        .await
        .into_result()?;
    Ok(StatusCode::NO_CONTENT)
}
