use crate::api::schemas::{ErrorResponse, UserEnvelope};
use crate::auth::adapter::incoming::web::cookies::session_cookie;
use crate::auth::application::use_cases::login_user::{LoginError, LoginRequest};
use crate::shared::api::{keyed, ApiResponse};
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Login request from client
#[derive(Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub username: String,

    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub password: String,
}

/// User login
///
/// Verifies credentials and sets the `access_token` session cookie.
/// The token is never returned in the body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = UserEnvelope),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/login")]
pub async fn login_user_handler(
    req: web::Json<LoginRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();

    info!(username = %dto.username, "Login attempt");

    let request = match LoginRequest::new(dto.username, dto.password) {
        Ok(req) => req,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.login_user_use_case.execute(request).await {
        Ok(response) => {
            let cookie = session_cookie(&response.token, data.cookie_secure);
            let user_id = response.user.id;

            let mut http = match keyed("user", response.user) {
                Ok(body) => ApiResponse::success_with_message("Login successful", body),
                Err(e) => {
                    error!(error = %e, "Failed to serialize user");
                    return ApiResponse::internal_error();
                }
            };
            if let Err(e) = http.add_cookie(&cookie) {
                error!(error = %e, "Failed to set session cookie");
                return ApiResponse::internal_error();
            }

            info!(user_id = %user_id, "User logged in successfully");
            http
        }

        Err(LoginError::UserNotFound) => {
            warn!("Login failed: user not found");
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(LoginError::InvalidCredentials) => {
            warn!("Login failed: invalid credentials");
            ApiResponse::bad_request("INVALID_CREDENTIALS", "Invalid credentials")
        }

        Err(LoginError::PasswordVerificationFailed(ref e)) => {
            error!(error = %e, "Password verification failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::TokenGenerationFailed(ref e)) => {
            error!(error = %e, "Token generation failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::QueryError(ref e)) => {
            error!(error = %e, "Database query failed");
            ApiResponse::internal_error()
        }
    }
}
