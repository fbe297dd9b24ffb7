use crate::api::schemas::{ErrorResponse, MessageResponse, UserEnvelope};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::auth::adapter::incoming::web::extractors::SESSION_COOKIE;
use crate::auth::adapter::incoming::web::routes::{
    LoginRequestDto, RegisterUserRequest, UpdateUserRequest,
};
use crate::auth::application::domain::entities::{Role, UserView};
use crate::auth::application::policies::password_strength::PasswordRequirements;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Admin API",
        version = "1.0.0",
        description = "Authentication and user endpoints of the storefront admin backend"
    ),
    paths(
        crate::auth::adapter::incoming::web::routes::register_user_handler,
        crate::auth::adapter::incoming::web::routes::login_user_handler,
        crate::auth::adapter::incoming::web::routes::logout_user_handler,
        crate::auth::adapter::incoming::web::routes::current_user_handler,
        crate::auth::adapter::incoming::web::routes::update_user_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            UserEnvelope,
            UserView,
            Role,
            PasswordRequirements,
            RegisterUserRequest,
            LoginRequestDto,
            UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookieAuth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "HttpOnly session cookie set by login",
                ))),
            )
        }
    }
}
