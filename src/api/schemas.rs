// src/api/schemas.rs
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::application::domain::entities::UserView;

/// Error envelope
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always false for error responses
    #[schema(example = false)]
    pub success: bool,

    #[schema(example = 400)]
    pub status_code: u16,

    /// Error code for programmatic handling
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "Validation failed")]
    pub message: String,

    /// Field → message map, or the password `requirements` object
    #[schema(value_type = Option<Object>)]
    pub errors: Option<serde_json::Value>,
}

/// `{ success, message?, user }`
#[derive(Serialize, ToSchema)]
pub struct UserEnvelope {
    #[schema(example = true)]
    pub success: bool,

    #[schema(example = "Login successful")]
    pub message: Option<String>,

    pub user: UserView,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,

    #[schema(example = "Logged out successfully")]
    pub message: String,
}
