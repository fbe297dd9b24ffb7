use crate::api::schemas::{ErrorResponse, UserEnvelope};
use crate::auth::adapter::incoming::web::extractors::OptionalSession;
use crate::auth::application::domain::entities::Role;
use crate::auth::application::use_cases::register_user::{
    RegisterUser, RegisterUserError, RoleGrant,
};
use crate::shared::api::{keyed, ApiResponse};
use crate::AppState;
use actix_web::{http::StatusCode, post, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Request body for user registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    #[schema(example = "johndoe")]
    pub username: Option<String>,

    #[schema(example = "john@example.com")]
    pub email: Option<String>,

    #[schema(example = "SecurePass123!")]
    pub password: Option<String>,

    /// Only honoured for an admin session
    #[schema(example = "Customer")]
    pub roles: Option<Role>,
}

/// Register a user
///
/// Anyone may register a Customer. An admin session may assign any role.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserEnvelope),
        (status = 400, description = "Validation failed, weak password, or duplicate", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/register")]
pub async fn register_user_handler(
    req: web::Json<RegisterUserRequest>,
    session: OptionalSession,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let grant = match session.0 {
        Some(identity) if identity.is_admin() => RoleGrant::Admin(identity.id),
        _ => RoleGrant::SelfService,
    };

    let request = RegisterUser {
        username: dto.username,
        email: dto.email,
        password: dto.password,
        role: dto.roles,
    };

    match data.register_user_use_case.execute(request, grant).await {
        Ok(user) => {
            info!(user_id = %user.id, role = %user.role, "User registered");
            match keyed("user", user) {
                Ok(body) => ApiResponse::created("User registered successfully", body),
                Err(e) => {
                    error!(error = %e, "Failed to serialize user");
                    ApiResponse::internal_error()
                }
            }
        }
        Err(e) => register_error_response(e),
    }
}

fn register_error_response(err: RegisterUserError) -> HttpResponse {
    match err {
        RegisterUserError::Validation(errors) => {
            warn!(%errors, "Registration rejected");
            ApiResponse::validation("Validation failed", &errors)
        }
        RegisterUserError::WeakPassword(requirements) => ApiResponse::error_with_details(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Password does not meet requirements",
            Some(serde_json::json!({ "requirements": requirements })),
        ),
        RegisterUserError::AlreadyExists => {
            warn!("Registration rejected: username or email taken");
            ApiResponse::conflict("Username or email already exists")
        }
        RegisterUserError::HashingFailed(ref e) => {
            error!(error = %e, "Password hashing failed");
            ApiResponse::internal_error()
        }
        RegisterUserError::RepositoryError(ref e) => {
            error!(error = %e, "Repository error during registration");
            ApiResponse::internal_error()
        }
    }
}
