//! Unified error handling for the RPC transport.
//!
//! Provides a single error type that converts into the HTTP error envelope
//! `{"error": {"code", "message", "issues"?}}` served by the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, FieldErrors};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Service not found")]
    NotFound,

    #[error("No procedure found on path '{0}'")]
    ProcedureNotFound(String),

    #[error("Procedure '{0}' does not support this HTTP method")]
    MethodNotSupported(String),

    // Validation
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<AppError>>,
    },
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<FieldErrors>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound | AppError::ProcedureNotFound(_) => "NOT_FOUND",
            AppError::MethodNotSupported(_) => "METHOD_NOT_SUPPORTED",
            AppError::Validation(_) | AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "INTERNAL_SERVER_ERROR",
            AppError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::ProcedureNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the requested entity is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound)
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => format!("Validation failed: {}", errors),
            AppError::BadRequest(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal { message, source } => {
                match source {
                    Some(cause) => tracing::error!(cause = ?cause, "{}", message),
                    None => tracing::error!("Internal error: {}", message),
                }
                message.clone()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let issues = match &self {
            AppError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                issues,
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::NotFound(_) => AppError::NotFound,
            DomainError::Internal(msg) => AppError::internal(msg),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal {
            message: msg.into(),
            source: None,
        }
    }

    /// Wrap an unexpected failure behind a generic message, keeping the cause.
    ///
    /// Not-found and validation errors pass through untouched so callers can
    /// still branch on them.
    pub fn wrap(message: impl Into<String>, cause: AppError) -> Self {
        match cause {
            AppError::NotFound | AppError::Validation(_) | AppError::BadRequest(_) => cause,
            other => AppError::Internal {
                message: message.into(),
                source: Some(Box::new(other)),
            },
        }
    }
}
