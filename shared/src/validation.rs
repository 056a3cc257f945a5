//! Input validation functions
//!
//! Structural checks only. Request types also derive `validator::Validate`;
//! the functions here cover what the derive cannot express (secrets and
//! normalisation).

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::errors::ValidationError;

/// Longest accepted password, in bytes
pub const MAX_PASSWORD_LEN: usize = 128;

/// Longest accepted email address
pub const MAX_EMAIL_LEN: usize = 255;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

/// Canonical form used for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email_regex().is_match(email) {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(())
}

/// Validate a plaintext password
///
/// Only emptiness and an upper bound are enforced.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password cannot be empty"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "Name cannot be empty"));
    }
    if name.chars().count() > 100 {
        return Err(ValidationError::new("name", "Name too long"));
    }
    Ok(())
}

/// Validate a book title
pub fn validate_book_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "Title cannot be empty"));
    }
    if title.chars().count() > 255 {
        return Err(ValidationError::new("title", "Title too long"));
    }
    Ok(())
}

/// Validate a book description (may be empty)
pub fn validate_book_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > 2000 {
        return Err(ValidationError::new("description", "Description too long"));
    }
    Ok(())
}
