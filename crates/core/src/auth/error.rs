use thiserror::Error;

/// Errors from token and password handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token expired")]
    TokenExpired,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
