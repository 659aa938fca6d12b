use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::claims::{ClaimImportError, ClaimServiceError, RepositoryError};
use crate::workflows::insights::{InsightError, PeriodParseError};
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
    Claims(ClaimServiceError),
    Insights(InsightError),
    Import(ClaimImportError),
    Period(PeriodParseError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Claims(err) => write!(f, "claim error: {}", err),
            AppError::Insights(err) => write!(f, "insight error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Period(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Claims(err) => Some(err),
            AppError::Insights(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Period(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Import(_) | AppError::Period(_) => StatusCode::BAD_REQUEST,
            AppError::Claims(ClaimServiceError::Classification(_))
            | AppError::Claims(ClaimServiceError::MissingProduct)
            | AppError::Claims(ClaimServiceError::EmptyNote) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Claims(ClaimServiceError::InvalidTransition { .. })
            | AppError::Claims(ClaimServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Claims(ClaimServiceError::Repository(RepositoryError::NotFound))
            | AppError::Insights(InsightError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Claims(_)
            | AppError::Insights(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<ClaimServiceError> for AppError {
    fn from(value: ClaimServiceError) -> Self {
        Self::Claims(value)
    }
}

impl From<InsightError> for AppError {
    fn from(value: InsightError) -> Self {
        Self::Insights(value)
    }
}

impl From<ClaimImportError> for AppError {
    fn from(value: ClaimImportError) -> Self {
        Self::Import(value)
    }
}

impl From<PeriodParseError> for AppError {
    fn from(value: PeriodParseError) -> Self {
        Self::Period(value)
    }
}
