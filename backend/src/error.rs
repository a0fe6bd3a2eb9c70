//! Error handling for the Météo-Blob dashboard
//!
//! Provides consistent error responses in English and French

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::PipelineError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Upstream errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Sensor API returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    // Payload errors (format, missing field, invalid value, timestamp)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    // Published state errors
    #[error("History is not available")]
    HistoryUnavailable,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable code, also used as the fallback reason of a failed tick
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Network(_) | AppError::UpstreamStatus { .. } => "NETWORK_ERROR",
            AppError::Pipeline(e) => e.code(),
            AppError::HistoryUnavailable => "HISTORY_UNAVAILABLE",
            AppError::Configuration(_)
            | AppError::ConfigSource(_)
            | AppError::InvalidConfig(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_fr: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message_en, message_fr) = match &self {
            AppError::Network(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Sensor API unreachable: {}", msg),
                "Pas de signal...".to_string(),
            ),
            AppError::UpstreamStatus { status, .. } => (
                StatusCode::BAD_GATEWAY,
                format!("Sensor API returned status {}", status),
                "Pas de signal...".to_string(),
            ),
            AppError::Pipeline(e) => (
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                "Erreur Données".to_string(),
            ),
            AppError::HistoryUnavailable => (
                StatusCode::NOT_FOUND,
                "No history has been fetched successfully yet".to_string(),
                "Erreur Données".to_string(),
            ),
            AppError::Configuration(_)
            | AppError::ConfigSource(_)
            | AppError::InvalidConfig(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
                "Erreur de configuration".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
                "Erreur interne du serveur".to_string(),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message_en,
                message_fr,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and the poller
pub type AppResult<T> = Result<T, AppError>;
