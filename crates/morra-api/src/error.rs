//! Morra player service — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use morra_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database connection string could not be used.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Tracing or OpenTelemetry setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// A prometheus metric could not be created or registered.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
            DomainError::DeadlineExceeded => {
                (StatusCode::INTERNAL_SERVER_ERROR, "deadline_exceeded")
            }
            DomainError::NotConfigured => (StatusCode::FORBIDDEN, "not_configured"),
        }
    }

    /// Renders the error body under an explicit status, overriding the
    /// default mapping.
    #[must_use]
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let (_, error_code) = self.status_and_code();
        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        self.into_response_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_deadline_exceeded_maps_to_500() {
        assert_eq!(
            status_of(DomainError::DeadlineExceeded),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_configured_maps_to_403() {
        assert_eq!(status_of(DomainError::NotConfigured), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_startup_failures_convert_into_app_error() {
        let database: AppError = sqlx::Error::PoolTimedOut.into();
        let metrics: AppError = prometheus::Error::Msg("duplicate".into()).into();
        let server: AppError = std::io::Error::other("address in use").into();

        assert!(matches!(database, AppError::Database(_)));
        assert!(matches!(metrics, AppError::Metrics(_)));
        assert!(matches!(server, AppError::Server(_)));
        assert_eq!(server.to_string(), "server error: address in use");
    }

    #[test]
    fn test_explicit_status_overrides_mapping() {
        let response = ApiError(DomainError::Validation("blank".into()))
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
