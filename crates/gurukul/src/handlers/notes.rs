//! Study notes handlers: generation, listing, slide export, deletion.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use gurukul_core::classroom::{GenerateNotes, Notes};
use gurukul_core::services::NotesSpec;
use gurukul_core::storage::{default_limit, default_page, Page, Pagination, RepositoryError};

use crate::{extractors::CurrentUser, state::AppState};

use super::{authz::require_staff, download, AppError};

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Generate notes (POST /api/notes).
pub async fn create_notes(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<GenerateNotes>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let language = payload.language.unwrap_or_default();
    let spec = NotesSpec {
        board: payload.board.clone(),
        class_level: payload.class_level,
        subject: payload.subject.clone(),
        chapter: payload.chapter.clone(),
        language,
    };

    let content = state.completions.generate_notes(&spec).await?;

    let notes = Notes::new(
        user.id,
        payload.board,
        payload.class_level,
        payload.subject,
        payload.chapter,
        content,
        language,
    );
    state.notes.create_notes(&notes).await?;

    tracing::info!(notes_id = %notes.id, chapter = %notes.chapter, "Generated notes");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Notes generated successfully",
            "notes": notes,
        })),
    ))
}

/// List the teacher's notes (GET /api/notes).
pub async fn list_notes(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;

    let page = Page::new(query.page, query.limit);
    let result = state.notes.list_notes(user.id, page).await?;

    Ok(Json(serde_json::json!({
        "notes": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

/// Get single notes by ID (GET /api/notes/{id}).
pub async fn get_notes(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let notes = state
        .notes
        .get_notes(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Notes",
            id: id.to_string(),
        })?;

    Ok(Json(serde_json::json!({ "notes": notes })))
}

/// Export notes as a slide deck (GET /api/notes/{id}/export).
pub async fn export_notes(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let notes = state
        .notes
        .get_notes(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Notes",
            id: id.to_string(),
        })?;

    let document = state.renderer.render_notes_deck(&notes).await?;

    download::send_document(&state.config.upload_dir, &format!("notes-{id}"), document).await
}

/// Delete notes owned by the caller (DELETE /api/notes/{id}).
pub async fn delete_notes(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;

    state.notes.delete_notes(id, user.id).await?;

    tracing::info!(notes_id = %id, "Deleted notes");

    Ok(Json(serde_json::json!({
        "message": "Notes deleted successfully",
    })))
}
