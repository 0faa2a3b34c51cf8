//! services/admin-api/src/error.rs
//!
//! Defines the primary error type for the entire admin service and its
//! mapping onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use connectia_core::ports::PortError;
use serde_json::json;

use crate::config::ConfigError;

/// The primary error type for the `admin-api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the data-access port.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error raised while running database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a failure while writing a reporting-query export file.
    #[error("Export Error: {0}")]
    Export(#[from] crate::adapters::ExportError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Converts `ApiError` into an HTTP response with a `{"error": ...}` body.
///
/// Validation and duplicate-email failures are the caller's fault (400),
/// missing rows are 404, a delete blocked by referencing rows is 400 with a
/// hint, and everything else is a 500 that hides the internal detail.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Port(PortError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Port(PortError::Duplicate(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Port(PortError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            ApiError::Port(PortError::Integrity(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("Cannot complete the operation, other records still reference this one: {}", msg),
            ),
            ApiError::Port(PortError::Unexpected(msg)) => {
                tracing::error!(error = %msg, "Unexpected port error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            other => {
                tracing::error!(error = ?other, "Internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_expected_status_codes() {
        let cases = [
            (PortError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (PortError::Duplicate("dup".into()), StatusCode::BAD_REQUEST),
            (PortError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (PortError::Integrity("fk".into()), StatusCode::BAD_REQUEST),
            (
                PortError::Unexpected("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
