//! Registration input validation

use regex::Regex;
use std::sync::OnceLock;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a display name or surname
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > 64 {
        return Err(format!("{} must be at most 64 characters long", field));
    }

    Ok(())
}

/// Validate password and its confirmation
pub fn validate_password(password: &str, repeat_password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password != repeat_password {
        return Err("Passwords do not match".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err("Password must contain at least one letter and one digit".to_string());
    }

    Ok(())
}
