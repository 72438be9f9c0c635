//! Error types for lenspost
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.
//!
//! Validation failures carry field-level detail and surface as
//! `{"errors": [{"field", "issue"}]}`; everything else surfaces as
//! `{"message": ...}` with the status carrying the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub issue: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
        }
    }
}

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced entity absent (404)
    #[error("Resource not found")]
    NotFound,

    /// Missing or invalid identity (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Acting outside one's rights (403)
    #[error("Access denied")]
    Forbidden,

    /// Malformed or missing input, with field-level detail (400)
    #[error("Validation error")]
    Validation(Vec<FieldIssue>),

    /// Operation not permitted by the domain rules, e.g. self-follow (400)
    #[error("{0}")]
    InvalidOperation(String),

    /// Storage error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Single-field validation failure
    pub fn invalid_field(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self::Validation(vec![FieldIssue::new(field, issue)])
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Validation(_) => "validation",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// Flatten boundary validation failures into field-level issues.
    fn from(errors: validator::ValidationErrors) -> Self {
        let issues = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    FieldIssue::new(
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|message| message.to_string())
                            .unwrap_or_else(|| "is invalid".to_string()),
                    )
                })
            })
            .collect();

        AppError::Validation(issues)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body. Storage and internal failures are logged
    /// and surfaced as a generic message.
    fn into_response(self) -> Response {
        use axum::Json;

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[self.kind()]).inc();

        let (status, body) = match &self {
            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "errors": issues }),
            ),
            AppError::InvalidOperation(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "message": message }),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "message": self.to_string() }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "message": self.to_string() }),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "message": self.to_string() }),
            ),
            AppError::Database(error) => {
                tracing::error!(%error, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "message": "Database error" }),
                )
            }
            AppError::Config(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "message": message }),
            ),
            AppError::Internal(error) => {
                tracing::error!(%error, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
