//! Error types shared by the Bookshelf crates

use thiserror::Error;

/// Reasons a bearer token can be rejected
///
/// `Malformed` and `InvalidSignature` are permanent for a given token string;
/// only a token that was once valid can become `Expired`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,
}

/// Validation failure for a single input field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("email", "Invalid email format");
        assert_eq!(err.to_string(), "email: Invalid email format");
    }

    #[test]
    fn test_token_error_display() {
        assert_eq!(TokenError::Expired.to_string(), "Token expired");
        assert_eq!(TokenError::InvalidSignature.to_string(), "Invalid token signature");
    }
}
