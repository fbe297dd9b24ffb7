use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::modules::lifecycle::application::domain::EntityConfig;
use crate::modules::lifecycle::application::ports::incoming::LifecycleError;
use crate::shared::api::ApiResponse;

pub fn not_found_response(config: &EntityConfig) -> HttpResponse {
    ApiResponse::not_found(
        &config.not_found_code(),
        &format!("{} not found", config.label),
    )
}

/// Maps a lifecycle failure onto the error envelope for `config`'s entity.
pub fn lifecycle_error_response(config: &EntityConfig, err: LifecycleError) -> HttpResponse {
    match err {
        LifecycleError::Validation(errors) => {
            warn!(entity = config.singular, %errors, "Validation failed");
            ApiResponse::validation("Validation failed", &errors)
        }
        LifecycleError::Forbidden => ApiResponse::forbidden(
            "FORBIDDEN",
            "You are not authorized to perform this action",
        ),
        LifecycleError::NotFound(_) => not_found_response(config),
        LifecycleError::Conflict(message) => {
            warn!(entity = config.singular, %message, "Uniqueness conflict");
            ApiResponse::conflict(&message)
        }
        LifecycleError::Repository(ref e) => {
            error!(entity = config.singular, error = %e, "Repository error");
            ApiResponse::internal_error()
        }
    }
}
