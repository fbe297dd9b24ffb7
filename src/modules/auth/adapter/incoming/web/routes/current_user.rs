use crate::api::schemas::{ErrorResponse, UserEnvelope};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::use_cases::current_user::CurrentUserError;
use crate::shared::api::{keyed, ApiResponse};
use crate::AppState;
use actix_web::{get, web, Responder};
use tracing::{error, warn};

/// Current user
///
/// Returns the profile behind the session cookie.
#[utoipa::path(
    get,
    path = "/api/auth/current-user",
    tag = "auth",
    responses(
        (status = 200, description = "Profile of the session owner", body = UserEnvelope),
        (status = 401, description = "No session cookie", body = ErrorResponse),
        (status = 403, description = "Invalid session token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
    ),
    security(("cookieAuth" = []))
)]
#[get("/api/auth/current-user")]
pub async fn current_user_handler(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.current_user_use_case.execute(&user.identity).await {
        Ok(view) => match keyed("user", view) {
            Ok(body) => ApiResponse::success(body),
            Err(e) => {
                error!(error = %e, "Failed to serialize user");
                ApiResponse::internal_error()
            }
        },
        Err(CurrentUserError::NotFound) => {
            warn!(user_id = %user.identity.id, "Session refers to a missing user");
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(CurrentUserError::QueryError(ref e)) => {
            error!(error = %e, "Failed to load current user");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::{Identity, Role};
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::{fast_hasher, seed_user, session_cookie_for, test_token_data};
    use actix_web::{test, App};
    use uuid::Uuid;

    #[actix_web::test]
    async fn test_returns_session_owner() {
        let builder = TestAppStateBuilder::default();
        let identity =
            seed_user(&builder.users, fast_hasher().as_ref(), "carol", "Passw0rd!", Role::Manager).await;

        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .app_data(test_token_data())
                .service(current_user_handler),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/current-user")
            .cookie(session_cookie_for(&identity))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "carol");
        assert_eq!(body["user"]["roles"], "Manager");
    }

    #[actix_web::test]
    async fn test_missing_user_is_404() {
        let ghost = Identity::new(Uuid::new_v4(), Role::Customer);
        let app = test::init_service(
            App::new()
                .app_data(TestAppStateBuilder::default().build())
                .app_data(test_token_data())
                .service(current_user_handler),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/current-user")
            .cookie(session_cookie_for(&ghost))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "USER_NOT_FOUND");
    }
}
