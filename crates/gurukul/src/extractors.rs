//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use gurukul_core::auth::{verify_token, AuthError};
use gurukul_core::classroom::User;

use crate::handlers::AppError;
use crate::state::AppState;

/// Extractor for the authenticated user. Returns 401 if the bearer
/// token is missing, invalid, expired, or names a user that no longer
/// exists.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let header_value = header
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Expected a bearer token"))?;

        let claims =
            verify_token(&state.config.jwt_secret, token).map_err(|err| match err {
                AuthError::TokenExpired => AppError::unauthorized("Token expired"),
                _ => AppError::unauthorized("Invalid token"),
            })?;

        // Re-load the user so tokens for deleted accounts stop working.
        let user = state
            .users
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        Ok(CurrentUser(user))
    }
}
