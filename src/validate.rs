// Client-side field validation
// Mirrors the backend's signup and password rules so bad input fails
// before it costs a network round trip.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ApiError, Result};

// Validation patterns
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d{6,15}$").unwrap());

static LETTER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").unwrap());

static DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

pub fn email(value: &str) -> Result<()> {
    if EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Enter a valid email address.".to_string(),
        ))
    }
}

/// Optional field: an empty phone number is accepted.
pub fn phone_number(value: &str) -> Result<()> {
    if value.is_empty() || PHONE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Enter a valid phone number, It should be between 6 and 15 digits long.".to_string(),
        ))
    }
}

pub fn password(value: &str) -> Result<()> {
    if value.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long.".to_string(),
        ));
    }
    if !LETTER_PATTERN.is_match(value) {
        return Err(ApiError::Validation(
            "Password must contain at least one letter (a-z or A-Z).".to_string(),
        ));
    }
    if !DIGIT_PATTERN.is_match(value) {
        return Err(ApiError::Validation(
            "Password must contain at least one digit (0-9).".to_string(),
        ));
    }
    Ok(())
}

pub fn confirmation(password: &str, confirm: &str) -> Result<()> {
    if password == confirm {
        Ok(())
    } else {
        Err(ApiError::Validation("Passwords do not match.".to_string()))
    }
}
