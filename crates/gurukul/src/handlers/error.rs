use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use gurukul_core::auth::AuthError;
use gurukul_core::classroom::ValidationError;
use gurukul_core::services::ServiceError;
use gurukul_core::storage::{repository_error_to_status_code, RepositoryError};

use super::error_body;

/// Application error returned by handlers.
///
/// `?` on repository, collaborator, validation, and I/O errors lands in
/// `Internal`, which is mapped to a status code by downcasting at
/// response time. `Status` carries explicit pre-check failures (bad
/// credentials, missing upload, role denials).
#[derive(Debug)]
pub enum AppError {
    Status(StatusCode, String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::FORBIDDEN, message.into())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Status code for a wrapped internal error.
fn internal_status(err: &anyhow::Error) -> (StatusCode, String) {
    if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
        let code = repository_error_to_status_code(repo_error);
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, repo_error.to_string());
    }
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return (StatusCode::BAD_REQUEST, validation.to_string());
    }
    if err.downcast_ref::<ServiceError>().is_some() {
        // Collaborator failures, including malformed completions, are
        // upstream faults rather than faults of this service.
        return (StatusCode::BAD_GATEWAY, err.to_string());
    }
    if let Some(auth) = err.downcast_ref::<AuthError>() {
        return (StatusCode::UNAUTHORIZED, auth.to_string());
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Status(status, message) => {
                tracing::warn!(status = %status, message = %message, "API error");
                (status, message)
            }
            AppError::Internal(err) => {
                let (status, message) = internal_status(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, "Application error");
                } else {
                    tracing::warn!(status = %status, error = %err, "Request failed");
                }
                (status, message)
            }
        };

        (status, error_body(message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let error = AppError::from(RepositoryError::NotFound {
            entity_type: "Notes",
            id: "x".to_string(),
        });
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = AppError::from(ValidationError::required("board"));
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_errors_map_to_502() {
        let error = AppError::from(ServiceError::MalformedCompletion("bad".to_string()));
        assert_eq!(status_of(error), StatusCode::BAD_GATEWAY);

        let error = AppError::from(ServiceError::http("ocr", "refused"));
        assert_eq!(status_of(error), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_unknown_error_maps_to_500() {
        let error = AppError::from(std::io::Error::other("disk on fire"));
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_explicit_status_passes_through() {
        assert_eq!(
            status_of(AppError::unauthorized("Invalid credentials")),
            StatusCode::UNAUTHORIZED
        );
    }
}
