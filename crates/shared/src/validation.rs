//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    // Intentionally loose: local@domain.tld with no whitespace, nothing more.
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Validates that an email matches the `local@domain.tld` pattern.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

/// Validates that a required text field is present and non-blank.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}
