use crate::api::schemas::{ErrorResponse, UserEnvelope};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::domain::entities::{Role, User};
use crate::auth::application::use_cases::update_user::{UpdateUser, UpdateUserError};
use crate::modules::lifecycle::adapter::incoming::web::errors::{
    lifecycle_error_response, not_found_response,
};
use crate::modules::lifecycle::adapter::incoming::web::handlers::entity_response;
use crate::modules::lifecycle::application::domain::LifecycleEntity;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update of a user. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Strength-checked and hashed before storage
    pub password: Option<String>,
    /// Admin only
    pub roles: Option<Role>,
    /// Admin only; recomputes `pointsRank`
    pub points: Option<i64>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.roles,
            points: req.points,
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/auth/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Validation failed, weak password, or duplicate", body = ErrorResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "User not found or deleted", body = ErrorResponse),
    ),
    security(("cookieAuth" = []))
)]
pub async fn update_user_handler(
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let Ok(user_id) = Uuid::parse_str(path.trim()) else {
        return not_found_response(&User::CONFIG);
    };

    match data
        .update_user_use_case
        .execute(&user.identity, user_id, req.into_inner().into())
        .await
    {
        Ok(view) => {
            info!(%user_id, actor = %user.identity.id, "User updated");
            entity_response::<User>(Some("User updated successfully"), view)
        }
        Err(UpdateUserError::Lifecycle(e)) => lifecycle_error_response(&User::CONFIG, e),
        Err(UpdateUserError::WeakPassword(requirements)) => ApiResponse::error_with_details(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Password does not meet requirements",
            Some(serde_json::json!({ "requirements": requirements })),
        ),
        Err(UpdateUserError::HashingFailed(ref e)) => {
            error!(error = %e, "Password hashing failed");
            ApiResponse::internal_error()
        }
    }
}
