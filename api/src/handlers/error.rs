//! Mapping of domain errors onto HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use gk_core::errors::{AuthError, DomainError, StoreError, ValidationError};
use gk_shared::errors::{error_codes, ErrorResponse};
use std::collections::HashMap;
use tracing::{debug, error};
use validator::ValidationErrors;

/// Domain error carried to the HTTP boundary
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self(error.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self(error.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self(error.into())
    }
}

impl ApiError {
    /// Status, error code and client-facing message for this error
    ///
    /// Credential and token failures share one generic message so callers
    /// cannot tell which check rejected them.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            DomainError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                e.to_string(),
            ),
            DomainError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                format!("{} not found", resource),
            ),
            DomainError::Token(_) => unauthorized(),
            DomainError::Auth(auth) => match auth {
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    error_codes::CONFLICT,
                    "User already exists".to_string(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    error_codes::UNAUTHORIZED,
                    "Invalid credentials".to_string(),
                ),
                AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::SessionNotFound
                | AuthError::TokenReuseDetected
                | AuthError::Unauthorized => unauthorized(),
                AuthError::StoreUnavailable { .. } | AuthError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    error_codes::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                ),
                AuthError::Unexpected { .. } => internal(),
            },
            DomainError::Database { .. } | DomainError::Internal { .. } => internal(),
        }
    }
}

fn unauthorized() -> (StatusCode, &'static str, String) {
    (
        StatusCode::UNAUTHORIZED,
        error_codes::UNAUTHORIZED,
        "Invalid or expired token".to_string(),
    )
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_codes::INTERNAL_ERROR,
        "An internal error occurred".to_string(),
    )
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code, message) = self.classify();
        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse::new(code, message))
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    ApiError(error).error_response()
}

/// Render request DTO validation failures as a 400 with per-field messages
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let fields: HashMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    debug!(fields = ?fields, "Request failed validation");
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .add_detail("fields", fields),
    )
}

/// Render unreadable JSON bodies as a 400 error response
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid request body: {}", err),
    ));
    InternalError::from_response(err, response).into()
}
