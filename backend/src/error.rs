//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting service errors to appropriate HTTP responses. Services never
//! pick status codes themselves; they return an `ApiError` variant and the
//! mapping lives here.

use crate::auth::HashError;
use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_shared::{ErrorDetail, ErrorResponse, TokenError, ValidationError};
use thiserror::Error;
use tracing::error;

/// Message returned for every failed login, whatever the cause
pub const DENIED_MESSAGE: &str = "Invalid email or password";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Credential check failed. Carries no detail so that an unknown email
    /// and a wrong password are indistinguishable.
    #[error("Invalid email or password")]
    Denied,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Storage error")]
    Store(#[from] StoreError),

    #[error("Password hashing error")]
    Hash(#[from] HashError),
}

impl ApiError {
    /// Shorthand for a validation error without a field
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            message: err.message,
            field: Some(err.field),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Only the first failing field is reported
        let first = errors.field_errors().into_iter().next().map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            (field.to_string(), message)
        });

        match first {
            Some((field, message)) => ApiError::Validation {
                message,
                field: Some(field),
            },
            None => ApiError::validation(errors.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            ApiError::Validation { message, field: f } => {
                field = f.clone();
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::Denied => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                DENIED_MESSAGE.to_string(),
            ),
            ApiError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "DUPLICATE_EMAIL",
                "Email already registered".to_string(),
            ),
            ApiError::InvalidToken(err) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", err.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Store(err) => {
                error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            ApiError::Hash(err) => {
                error!("Password hashing error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
