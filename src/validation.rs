//! Login form validation, run before any network call

use crate::api::ApiError;
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email.trim()) {
        return Err(ApiError::Validation("Invalid email".to_string()));
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    validate_email(email)?;
    validate_password(password)
}
