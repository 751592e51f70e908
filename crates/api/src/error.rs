use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cheers_core::error::CoreError;
use cheers_core::messaging::MessagingError;
use cheers_worker::{DispatchError, OnboardingError, RosterError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failed outbound Slack call.
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A resource addressed by something other than its numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid request signature.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::InvalidTimezone(tz) => {
                CoreError::Validation(format!("invalid timezone '{tz}'")).into()
            }
            DispatchError::Database(e) => Self::Database(e),
            DispatchError::Messaging(e) => Self::Messaging(e),
        }
    }
}

impl From<OnboardingError> for AppError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::Database(e) => Self::Database(e),
            OnboardingError::Directory(e) => Self::Messaging(e),
        }
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Database(e) => Self::Database(e),
            RosterError::Directory(e) => Self::Messaging(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Slack errors ---
            AppError::Messaging(MessagingError::MissingToken) => (
                StatusCode::CONFLICT,
                "SLACK_NOT_CONNECTED",
                "workspace is not connected to Slack yet".to_string(),
            ),
            AppError::Messaging(err) => {
                tracing::warn!(error = %err, "Slack call failed");
                (StatusCode::BAD_GATEWAY, "SLACK_ERROR", err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Check constraint violations (`ck_` or column checks) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return (
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                // PostgreSQL check_violation
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
