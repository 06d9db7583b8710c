use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiResponse;

use crate::{db::DbError, mapper::MappingError};

/// Error returned by every handler, rendered as the `{success: false, error}`
/// envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// `message` goes to the client; `cause` only to the log.
    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    pub fn internal(message: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            message,
            cause: cause.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a repository failure. Store detail never reaches the client.
    pub fn from_db(err: DbError, message: &'static str) -> Self {
        match err {
            DbError::NotFound(what) => AppError::not_found(what),
            DbError::Conflict(detail) => {
                tracing::debug!("Unique constraint: {}", detail);
                AppError::Conflict("Resource already exists".to_string())
            }
            DbError::Constraint(detail) => {
                tracing::debug!("Foreign key constraint: {}", detail);
                AppError::NotFound("Referenced resource not found".to_string())
            }
            err @ DbError::Io(_) => AppError::internal(message, err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal { message, cause } = &self {
            tracing::error!("{}: {:#}", message, cause);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Attach the client-facing message for the failing endpoint.
pub trait ResultExt<T> {
    fn or_fail(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, DbError> {
    fn or_fail(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|err| AppError::from_db(err, message))
    }
}

impl<T> ResultExt<T> for Result<T, MappingError> {
    fn or_fail(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|err| AppError::internal(message, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("Trip").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_db_errors_are_classified() {
        let err = AppError::from_db(DbError::NotFound("Itinerary"), "Failed");
        assert_eq!(err.to_string(), "Itinerary not found");

        let err = AppError::from_db(
            DbError::Conflict("UNIQUE constraint failed: users.email".into()),
            "Failed",
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(!err.to_string().contains("users.email"));

        let err = AppError::from_db(
            DbError::Io(sqlx::Error::PoolTimedOut),
            "Failed to fetch trips",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch trips");
    }

    #[test]
    fn test_mapping_error_is_internal() {
        let result: Result<(), MappingError> = Err(MappingError::Value {
            field: "trips.status",
            value: "bogus".to_string(),
        });
        let err = result.or_fail("Failed to fetch trip").unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch trip");
    }
}
