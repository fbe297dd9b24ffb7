use actix_web::{get, Responder};
use tracing::error;

use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::domain::entities::User;
use crate::catalog::application::domain::{Category, Product};
use crate::modules::lifecycle::application::domain::LifecycleEntity;
use crate::shared::api::{keyed, ApiResponse};

/// Table configuration for every lifecycle entity, for the admin UI.
#[get("/api/admin/entities")]
pub async fn list_entities_handler(_user: AuthenticatedUser) -> impl Responder {
    let entities = [User::CONFIG, Category::CONFIG, Product::CONFIG];
    match keyed("entities", entities) {
        Ok(body) => ApiResponse::success(body),
        Err(e) => {
            error!(error = %e, "Failed to serialize entity configuration");
            ApiResponse::internal_error()
        }
    }
}
