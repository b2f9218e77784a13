use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use taskboard_core::error::CoreError;

/// Error type returned by every handler and extractor.
///
/// Renders as `{"error": <message>, "code": <CODE>}`. Internal and
/// unclassified database failures are logged and answered with a generic
/// message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request body or parameter that could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(core) => core_status_and_body(core),
            AppError::Database(err) => database_status_and_body(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn core_status_and_body(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg),
        ),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// Postgres SQLSTATE codes that carry a client-facing meaning.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// `RowNotFound` is a 404, a unique violation on a `uq_*` constraint a 409,
/// and a foreign key violation (unknown category or profile id) a 400.
/// Anything else is a 500.
fn database_status_and_body(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return (
                    StatusCode::CONFLICT,
                    ErrorBody::new(
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    ),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(
                        "VALIDATION_ERROR",
                        format!("Referenced record does not exist: {constraint}"),
                    ),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
}
