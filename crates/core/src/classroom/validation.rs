//! Field-level validation rules shared by request payloads.

use super::ValidationError;

/// Class levels served by the curriculum.
pub const MIN_CLASS_LEVEL: u8 = 6;
pub const MAX_CLASS_LEVEL: u8 = 12;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validates that a class level is within 6..=12.
pub fn validate_class_level(class_level: u8) -> Result<(), ValidationError> {
    if !(MIN_CLASS_LEVEL..=MAX_CLASS_LEVEL).contains(&class_level) {
        return Err(ValidationError::invalid(
            "class",
            "must be between 6 and 12",
        ));
    }
    Ok(())
}

/// Minimal email shape check: something@something, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::invalid("email", "must be a valid address"));
    }
    Ok(())
}

/// Validates the registration password length.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::invalid(
            "password",
            "must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Validates that a free-text field is non-empty after trimming.
pub fn validate_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates that a mark value is a finite, non-negative number.
pub fn validate_marks(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::invalid(field, "must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_level_bounds() {
        assert!(validate_class_level(6).is_ok());
        assert!(validate_class_level(12).is_ok());
        assert!(validate_class_level(5).is_err());
        assert!(validate_class_level(13).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("  asha@example.com  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@nodot").is_err());
        assert!(validate_email("a sha@example.com").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_marks_must_be_non_negative_and_finite() {
        assert!(validate_marks("marks", 0.0).is_ok());
        assert!(validate_marks("marks", 7.5).is_ok());
        assert!(validate_marks("marks", -1.0).is_err());
        assert!(validate_marks("marks", f64::NAN).is_err());
        assert!(validate_marks("marks", f64::INFINITY).is_err());
    }
}
