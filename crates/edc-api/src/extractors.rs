//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use edc_auth::{extract_bearer_token, CurrentUser, JwtService};
use edc_core::PaginationParams;
use edc_services::auth::authenticate;
use edc_services::ServiceContext;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceContext,
    pub jwt: Arc<JwtService>,
    pub info: Arc<InstanceInfo>,
}

/// What the API root reports about this instance
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub app_title: String,
    pub version: String,
}

impl Default for InstanceInfo {
    fn default() -> Self {
        Self {
            app_title: "EDC Marchés360".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl AppState {
    pub fn new(services: ServiceContext, jwt: JwtService, info: InstanceInfo) -> Self {
        Self {
            services,
            jwt: Arc::new(jwt),
            info: Arc::new(info),
        }
    }
}

#[derive(Deserialize)]
struct TokenParam {
    access_token: Option<String>,
}

/// Authenticated user extractor
///
/// Reads `Authorization: Bearer <token>`, or an `access_token` query
/// parameter for clients that cannot set headers (EventSource).
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let from_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .map(str::to_string);
        let token = match from_header {
            Some(token) => token,
            None => Query::<TokenParam>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(param)| param.access_token)
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| ApiError::unauthorized("Authentication required"))?,
        };

        let user = authenticate(&app_state.services, &app_state.jwt, &token).await?;
        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pagination parameters, defaults when absent or malformed
pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PaginationParams::default()));
        Ok(Pagination(params))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PaginationParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
