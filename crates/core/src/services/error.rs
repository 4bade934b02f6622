use thiserror::Error;

/// Errors from external collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transport-level failure reaching the collaborator.
    #[error("request to {service} failed: {reason}")]
    Http {
        service: &'static str,
        reason: String,
    },
    /// The collaborator answered with a non-success status.
    #[error("{service} returned status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },
    /// The completion came back but did not match the expected schema.
    /// Kept distinct from transport failures so callers can tell a
    /// misbehaving model from a broken connection.
    #[error("malformed completion: {0}")]
    MalformedCompletion(String),
    /// The collaborator's response body could not be decoded.
    #[error("{service} response could not be decoded: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}

impl ServiceError {
    pub fn http(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Http {
            service,
            reason: reason.into(),
        }
    }

    pub fn invalid_response(service: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service,
            reason: reason.into(),
        }
    }
}

/// Result type for collaborator operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
