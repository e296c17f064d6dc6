use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level failures raised while booting or serving.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Workflow(ServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Workflow(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed with application error");
        let body = Json(json!({ "error": "internal server error" }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Workflow(value)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists or changed concurrently")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("slot already confirmed for another appointment on this property")]
    SlotTaken,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Failure taxonomy shared by every marketplace workflow.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) | ServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::BadRequest(_)
            | ServiceError::Repository(RepositoryError::SlotTaken)
            | ServiceError::Repository(RepositoryError::Conflict) => StatusCode::BAD_REQUEST,
            ServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::NotFound(message)
            | ServiceError::Forbidden(message)
            | ServiceError::BadRequest(message) => message.clone(),
            ServiceError::Repository(RepositoryError::NotFound) => "Not found".to_string(),
            ServiceError::Repository(RepositoryError::SlotTaken) => {
                "This slot is already booked for this property".to_string()
            }
            ServiceError::Repository(RepositoryError::Conflict) => {
                "The record changed while processing the request".to_string()
            }
            ServiceError::Repository(RepositoryError::Unavailable(_)) => {
                "internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "workflow failed");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_taken_is_reported_as_bad_request() {
        let err = ServiceError::from(RepositoryError::SlotTaken);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("already booked"));
    }

    #[test]
    fn unavailable_repository_hides_details() {
        let err = ServiceError::from(RepositoryError::Unavailable("pg down at 10.0.0.4".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn taxonomy_maps_to_status_classes() {
        assert_eq!(
            ServiceError::not_found("Property not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::forbidden("Not allowed").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::bad_request("Unsupported status update").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
