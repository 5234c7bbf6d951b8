/// Error handling for the API server
///
/// One unified error type maps every typed failure from the shared crate
/// to an HTTP status and a JSON body. Handlers return
/// `Result<T, ApiError>`; conversion to a response happens in one place.
///
/// The taxonomy this service exposes is deliberately small:
/// - 400 for malformed input, validation failures and duplicate emails
/// - 401 for anything credential-shaped, always with a generic message
/// - 404 for missing entities, including the seeded owner role
///   (a deployment fault that deserves a loud log line, not a user hint)
/// - 500 for everything else, with the cause logged server-side only

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use teamspace_shared::auth::credentials::CredentialError;
use teamspace_shared::auth::jwt::JwtError;
use teamspace_shared::auth::password::PasswordError;
use teamspace_shared::bootstrap::BootstrapError;
use teamspace_shared::session::SessionError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): malformed input, duplicate email
    BadRequest(String),

    /// Unauthorized (401): credential mismatch, missing/invalid token
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Bad request (400) with per-field details
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500); message is logged, never sent
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log the cause but never expose it to clients
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

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // The users.email unique index is the real duplicate guard
                if db_err.constraint() == Some("users_email_key") {
                    return ApiError::BadRequest("Email already exists".to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert bootstrap errors to API errors
impl From<BootstrapError> for ApiError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::EmailTaken => {
                ApiError::BadRequest("Email already exists".to_string())
            }
            BootstrapError::EmailMissing => {
                ApiError::BadRequest("Identity provider supplied no email".to_string())
            }
            BootstrapError::OwnerRoleMissing => {
                tracing::error!("owner role missing from roles table; seed data is incomplete");
                ApiError::NotFound("Owner role not found".to_string())
            }
            BootstrapError::WorkspaceMissing(user_id) => {
                tracing::error!(user_id = %user_id, "user has no resolvable current workspace");
                ApiError::NotFound("Workspace not found".to_string())
            }
            BootstrapError::Database(e) => e.into(),
        }
    }
}

/// Convert credential-verification errors to API errors
///
/// Everything credential-shaped collapses into one generic 401 so a
/// response never reveals whether an email is registered. The orphaned
/// account case is a data-integrity fault and stays a 404, mirroring how
/// the bootstrap treats its own integrity failures.
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::UnknownAccount
            | CredentialError::NoPasswordSet
            | CredentialError::PasswordMismatch => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            CredentialError::OrphanedAccount(account_id) => {
                tracing::error!(account_id = %account_id, "account has no linked user");
                ApiError::NotFound("User not found for the given account".to_string())
            }
            CredentialError::Hash(e) => {
                ApiError::InternalError(format!("Password verification failed: {}", e))
            }
            CredentialError::Database(e) => e.into(),
        }
    }
}

/// Convert password-hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Sign(msg) => ApiError::InternalError(format!("Token signing failed: {}", msg)),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidAudience => {
                ApiError::Unauthorized("Token audience mismatch".to_string())
            }
            JwtError::Invalid(msg) => ApiError::Unauthorized(format!("Invalid token: {}", msg)),
        }
    }
}

/// Convert session-store errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::InternalError(format!("Session store error: {}", err))
    }
}
