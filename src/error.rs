//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::leads::LeadError;
use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::validation::ValidationIssue;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Selection is not ready: {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Lead error: {0}")]
    Lead(#[from] LeadError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration and price table loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse price table: {0}")]
    PriceTable(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation",
            AppError::Lead(_) => "lead",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string(), None),
            AppError::BadRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone(), None),
            AppError::Validation(issues) => {
                let reasons: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    self.to_string(),
                    Some(serde_json::json!({ "issues": reasons })),
                )
            }
            AppError::Lead(e) => {
                tracing::warn!("Lead rejected: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    None,
                )
            }
        };

        let body = PricingErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
