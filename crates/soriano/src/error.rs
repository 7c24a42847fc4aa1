use crate::club::{MissionError, WheelError};
use crate::config::ConfigError;
use crate::coverage::{CoverageServiceError, InvalidInputError, RepositoryError};
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    InvalidInput(InvalidInputError),
    Json(serde_json::Error),
    Wheel(WheelError),
    Coverage(CoverageServiceError),
    Missions(MissionError),
    Session(SessionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::InvalidInput(err) => write!(f, "invalid input: {}", err),
            AppError::Json(err) => write!(f, "malformed json: {}", err),
            AppError::Wheel(err) => write!(f, "prize wheel error: {}", err),
            AppError::Coverage(err) => write!(f, "coverage error: {}", err),
            AppError::Missions(err) => write!(f, "missions error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
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
            AppError::InvalidInput(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Wheel(err) => Some(err),
            AppError::Coverage(err) => Some(err),
            AppError::Missions(err) => Some(err),
            AppError::Session(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidInput(_)
            | AppError::Json(_)
            | AppError::Coverage(CoverageServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Coverage(CoverageServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Missions(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Wheel(_)
            | AppError::Coverage(_)
            | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
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

impl From<InvalidInputError> for AppError {
    fn from(value: InvalidInputError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<WheelError> for AppError {
    fn from(value: WheelError) -> Self {
        Self::Wheel(value)
    }
}

impl From<CoverageServiceError> for AppError {
    fn from(value: CoverageServiceError) -> Self {
        Self::Coverage(value)
    }
}

impl From<MissionError> for AppError {
    fn from(value: MissionError) -> Self {
        Self::Missions(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response = AppError::from(InvalidInputError::ProfileNotObject).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wheel_failures_map_to_server_error() {
        let response = AppError::from(WheelError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_stored_profile_maps_to_not_found() {
        let error = AppError::from(CoverageServiceError::from(RepositoryError::NotFound));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
