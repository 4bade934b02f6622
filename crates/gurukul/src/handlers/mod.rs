//! Request handlers.

pub mod answers;
pub mod auth;
pub mod authz;
pub mod download;
pub mod error;
pub mod health;
pub mod notes;
pub mod performance;
pub mod questions;

pub use error::AppError;

use axum::Json;

/// JSON error body used by every error response.
pub fn error_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message.into() }))
}
