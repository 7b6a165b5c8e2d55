/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`, which converts to an HTTP
/// status and a JSON body:
///
/// ```json
/// {
///   "error": "validation_error",
///   "message": "Request validation failed",
///   "details": [{ "field": "email", "code": "email", "message": "Email must be a valid email address" }]
/// }
/// ```
///
/// Service errors map as follows:
///
/// | ServiceError | Status |
/// |---|---|
/// | `NotFound` | 404 |
/// | `EmailTaken`, `InvalidStatusTransition` | 409 |
/// | `IncorrectPassword`, `PasswordReused` | 400 (field error) |
/// | anything else | 500 (details logged, not returned) |

use crate::validation::{field_error, Locale};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use userdesk_shared::services::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409 - duplicate email, disallowed status change
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 400 with per-field details
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// 500; the message is logged, never returned
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Machine-readable rule code (e.g., "required", "email")
    pub code: String,

    /// Translated error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Message for a path ID that is not a positive integer
    pub fn invalid_user_id() -> Self {
        ApiError::BadRequest("Invalid user id parameter".to_string())
    }

    /// Converts a service error, rendering field errors in `locale`
    pub fn from_service(err: ServiceError, locale: Locale) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::EmailTaken(_) | ServiceError::InvalidStatusTransition { .. } => {
                ApiError::Conflict(err.to_string())
            }
            ServiceError::IncorrectPassword => ApiError::ValidationError(vec![field_error(
                "current_password",
                "password_incorrect",
                locale,
            )]),
            ServiceError::PasswordReused => ApiError::ValidationError(vec![field_error(
                "new_password",
                "password_reused",
                locale,
            )]),
            ServiceError::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            ServiceError::Repository(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, Locale::default())
    }
}

/// Malformed or non-JSON request bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request payload");
        ApiError::BadRequest("Invalid request payload".to_string())
    }
}
