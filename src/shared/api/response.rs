// src/shared/api/response.rs
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use serde_json::{Map, Value};

/// Success envelope: `{ success: true, message?, ...data }`.
///
/// `data` is flattened into the top level, so it must serialize as a map.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

/// Error envelope: `{ success: false, statusCode, code, message, errors? }`.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub success: bool,
    pub status_code: u16,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// Builds `{ key: value }` for envelopes whose data key depends on the entity.
pub fn keyed<V: Serialize>(key: &str, value: V) -> Result<Map<String, Value>, serde_json::Error> {
    let mut map = Map::new();
    map.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(map)
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse {
            success: true,
            message: None,
            data,
        })
    }

    pub fn success_with_message(message: &str, data: T) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data,
        })
    }

    pub fn created(message: &str, data: T) -> HttpResponse {
        HttpResponse::Created().json(ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data,
        })
    }
}

impl ApiResponse<Map<String, Value>> {
    pub fn message(message: &str) -> HttpResponse {
        Self::success_with_message(message, Map::new())
    }
}

impl ApiResponse<()> {
    pub fn error(status: StatusCode, code: &str, message: &str) -> HttpResponse {
        Self::error_with_details(status, code, message, None)
    }

    pub fn error_with_details(
        status: StatusCode,
        code: &str,
        message: &str,
        errors: Option<Value>,
    ) -> HttpResponse {
        HttpResponse::build(status).json(ApiError {
            success: false,
            status_code: status.as_u16(),
            code: code.to_string(),
            message: message.to_string(),
            errors,
        })
    }

    pub fn not_found(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::NOT_FOUND, code, message)
    }

    pub fn bad_request(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn validation<E: Serialize>(message: &str, errors: &E) -> HttpResponse {
        Self::error_with_details(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message,
            serde_json::to_value(errors).ok(),
        )
    }

    pub fn forbidden(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::FORBIDDEN, code, message)
    }

    pub fn unauthorized(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::UNAUTHORIZED, code, message)
    }

    /// Uniqueness violations reuse the validation status code.
    pub fn conflict(message: &str) -> HttpResponse {
        Self::error(StatusCode::BAD_REQUEST, "CONFLICT", message)
    }

    pub fn internal_error() -> HttpResponse {
        Self::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An unexpected error occurred",
        )
    }
}
