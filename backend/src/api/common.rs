//! Error handling utilities for API responses.
//!
//! Provides the wire error format and the conversion between service-layer
//! errors and HTTP responses.
//!
//! # Response Format
//! All errors return consistent JSON bodies containing:
//! - `error`: Machine-readable error category
//! - `message`: Human-readable message
//! - `details`: Optional field-specific validation errors
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `From<ServiceError> for ApiError` picks the status code and category
//! 3. `IntoResponse` renders the JSON body
//!
//! Database detail never reaches the wire; it is logged and masked as a
//! generic 500.

use crate::errors::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Standard error body for all failing endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error category
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

/// An HTTP error response: status code plus the standard body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "permission_denied", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_operation", message)
    }

    /// 400 with per-field details from `validator`.
    pub fn validation_failed(errors: validator::ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                details: Some(validation_errors_to_field_errors(errors)),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        let (status, error_type, message) = match error {
            ServiceError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ServiceError::NotFound { entity, identifier } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} '{}' not found", entity, identifier),
            ),
            ServiceError::AlreadyExists { entity, identifier } => (
                StatusCode::CONFLICT,
                "already_exists",
                format!("{} '{}' already exists", entity, identifier),
            ),
            ServiceError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Email or password incorrect".to_string(),
            ),
            ServiceError::InactiveAccount => (
                StatusCode::FORBIDDEN,
                "inactive_account",
                "Account is inactive".to_string(),
            ),
            ServiceError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message)
            }
            ServiceError::PermissionDenied { message } => {
                (StatusCode::FORBIDDEN, "permission_denied", message)
            }
            ServiceError::InvalidOperation { message } => {
                (StatusCode::BAD_REQUEST, "invalid_operation", message)
            }
            ServiceError::Database { source } => {
                tracing::error!("Database error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Internal server error".to_string(),
                )
            }
            ServiceError::InternalError { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        ApiError::new(status, error_type, message)
    }
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(errors: validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .unwrap_or(&"Invalid value".into())
                    .to_string(),
            })
        })
        .collect()
}
