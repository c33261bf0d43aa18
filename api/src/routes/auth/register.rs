use actix_web::{web, HttpResponse};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{RegisterRequest, UserResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/register
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "password": "at-least-8-chars" }
/// ```
///
/// # Response
///
/// - 201 Created: the new user (never the password hash)
/// - 400 Bad Request: missing field, malformed email or short password
/// - 409 Conflict: email already registered
pub async fn register<U, S, H>(
    state: web::Data<AppState<U, S, H>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .register(&request.email, &request.password)
        .await
    {
        Ok(user) => HttpResponse::Created().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
