//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use edc_core::EdcError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// Anything the services report
    Domain(EdcError),
    /// Malformed request the services never saw
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Domain(EdcError::unauthorized(msg))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<EdcError> for ApiError {
    fn from(err: EdcError) -> Self {
        ApiError::Domain(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Domain(err) => {
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                }
                ErrorBody {
                    error: err.error_code(),
                    message: err.to_string(),
                    details: err.details(),
                }
            }
            ApiError::BadRequest(msg) => ErrorBody {
                error: "bad_request",
                message: msg.clone(),
                details: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use edc_core::ValidationErrors;

    #[test]
    fn test_status_follows_domain_error() {
        assert_eq!(
            ApiError::from(EdcError::not_found("Marche", "id", 1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(EdcError::conflict("taken")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_details() {
        let mut errors = ValidationErrors::new();
        errors.add("objet", "can't be blank");
        let response = ApiError::from(EdcError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
