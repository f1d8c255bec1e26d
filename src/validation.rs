//! Request field validation helpers.

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

/// Basic email shape check.
pub fn validate_email(field: &str, value: &str) -> Result<(), AppError> {
    if !email_re().is_match(value) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    if value.len() < min {
        return Err(AppError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if value.len() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Match a value against a caller-supplied pattern.
pub fn validate_pattern(field: &str, value: &str, pattern: &str) -> Result<(), AppError> {
    let re = Regex::new(pattern)
        .map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
    if !re.is_match(value) {
        return Err(AppError::Validation(format!(
            "{} does not match required pattern",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("email", "a@b.cz").is_ok());
        assert!(validate_email("email", "user.name@example.com").is_ok());
        assert!(validate_email("email", "nope").is_err());
        assert!(validate_email("email", "a@b").is_err());
        assert!(validate_email("email", "a b@c.d").is_err());
    }

    #[test]
    fn length_bounds() {
        assert!(validate_length("key", "welcome", 1, 255).is_ok());
        assert!(validate_length("key", "", 1, 255).is_err());
        assert!(validate_length("key", &"x".repeat(256), 1, 255).is_err());
    }

    #[test]
    fn pattern_check() {
        assert!(validate_pattern("code", "en", "^[a-z]{2,5}$").is_ok());
        assert!(validate_pattern("code", "EN!", "^[a-z]{2,5}$").is_err());
    }
}
