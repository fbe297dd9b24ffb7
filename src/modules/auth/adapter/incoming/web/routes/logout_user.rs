use crate::api::schemas::{ErrorResponse, MessageResponse};
use crate::auth::adapter::incoming::web::cookies::removal_cookie;
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use tracing::{error, info};

/// Logout
///
/// Clears the session cookie. The token itself stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
        (status = 401, description = "No session cookie", body = ErrorResponse),
        (status = 403, description = "Invalid session token", body = ErrorResponse),
    ),
    security(("cookieAuth" = []))
)]
#[post("/api/auth/logout")]
pub async fn logout_user_handler(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let mut resp = ApiResponse::message("Logged out successfully");
    if let Err(e) = resp.add_cookie(&removal_cookie(data.cookie_secure)) {
        error!(error = %e, "Failed to clear session cookie");
        return ApiResponse::internal_error();
    }

    info!(user_id = %user.identity.id, "User logged out");
    resp
}
