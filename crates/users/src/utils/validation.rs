//! Input validation utilities.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{UserError, UserResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

const MAX_EMAIL_LENGTH: usize = 255;
const MAX_BIO_LENGTH: usize = 500;

/// Trim a required field, failing when nothing is left
pub fn require_field(value: &str) -> UserResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::validation("All fields are required"));
    }
    Ok(trimmed)
}

/// Like [`require_field`] but hands back the value untouched. Credentials are
/// compared byte for byte, so surrounding whitespace is part of them.
pub fn require_secret(value: &str) -> UserResult<&str> {
    if value.trim().is_empty() {
        return Err(UserError::validation("All fields are required"));
    }
    Ok(value)
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> UserResult<()> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserError::validation("Email too long"));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserError::validation("Invalid email format"));
    }

    Ok(())
}

pub fn validate_bio(bio: &str) -> UserResult<()> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(UserError::validation(format!(
            "Bio must be at most {MAX_BIO_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// `Some(trimmed)` for a non-blank value, `None` otherwise
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
