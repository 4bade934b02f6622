use thiserror::Error;

/// Errors produced by request payload validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self::Required { field }
    }

    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_display() {
        assert_eq!(
            ValidationError::required("board").to_string(),
            "board is required"
        );
    }

    #[test]
    fn test_invalid_display() {
        assert_eq!(
            ValidationError::invalid("class", "must be between 6 and 12").to_string(),
            "class is invalid: must be between 6 and 12"
        );
    }
}
