//! Registration, login, and profile handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use gurukul_core::auth::{hash_password, issue_token, verify_password};
use gurukul_core::classroom::{LoginUser, RegisterUser, UpdateProfile};

use crate::{extractors::CurrentUser, state::AppState};

use super::AppError;

/// Register a new user (POST /api/auth/register).
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    if state.users.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::Status(
            StatusCode::CONFLICT,
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = payload.into_user(password_hash);
    state.users.create_user(&user).await?;

    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        user.role,
        state.config.token_ttl(),
    )?;

    tracing::info!(user_id = %user.id, role = ?user.role, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "token": token,
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role,
                "language_preference": user.language_preference,
            },
        })),
    ))
}

/// Log in with email and password (POST /api/auth/login).
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginUser>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        user.role,
        state.config.token_ttl(),
    )?;

    tracing::debug!(user_id = %user.id, "User logged in");

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "subjects": user.subjects,
            "classes": user.classes,
            "language_preference": user.language_preference,
            "subscription_tier": user.subscription_tier,
        },
    })))
}

/// Get the authenticated user's profile (GET /api/auth/profile).
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    // The password hash is skipped by the User serializer.
    Json(serde_json::json!({ "user": user }))
}

/// Update the authenticated user's profile (PUT /api/auth/profile).
pub async fn update_profile(
    CurrentUser(mut user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<UpdateProfile>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    payload.apply_to(&mut user);
    state.users.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "Updated profile");

    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}
