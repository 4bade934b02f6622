//! Question paper handlers: generation, listing, export, deletion.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use gurukul_core::classroom::{GeneratePaper, QuestionPaper};
use gurukul_core::services::PaperSpec;
use gurukul_core::storage::{default_limit, default_page, Page, Pagination, RepositoryError};

use crate::{extractors::CurrentUser, state::AppState};

use super::{authz::require_staff, download, AppError};

/// Query parameters for listing papers.
#[derive(Debug, Deserialize)]
pub struct ListPapersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Generate a question paper (POST /api/questions).
pub async fn create_paper(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<GeneratePaper>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let spec = PaperSpec {
        board: payload.board.clone(),
        class_level: payload.class_level,
        subject: payload.subject.clone(),
        chapter: payload.chapter.clone(),
        difficulty: payload.difficulty,
        language: payload.language.unwrap_or_default(),
    };

    let questions = state.completions.generate_questions(&spec).await?;

    let paper = QuestionPaper::new(
        user.id,
        payload.board,
        payload.class_level,
        payload.subject,
        payload.chapter,
        payload.difficulty,
        questions,
    );
    state.papers.create_paper(&paper).await?;

    tracing::info!(
        paper_id = %paper.id,
        subject = %paper.subject,
        total_marks = paper.total_marks,
        "Generated question paper"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Question paper generated successfully",
            "questionPaper": paper,
        })),
    ))
}

/// List the teacher's papers (GET /api/questions).
pub async fn list_papers(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListPapersQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;

    let page = Page::new(query.page, query.limit);
    let result = state.papers.list_papers(user.id, page).await?;

    Ok(Json(serde_json::json!({
        "questionPapers": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

/// Get a single paper by ID (GET /api/questions/{id}).
pub async fn get_paper(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let paper = state
        .papers
        .get_paper(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "QuestionPaper",
            id: id.to_string(),
        })?;

    Ok(Json(serde_json::json!({ "questionPaper": paper })))
}

/// Export a paper as a PDF (GET /api/questions/{id}/export).
pub async fn export_paper(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let paper = state
        .papers
        .get_paper(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "QuestionPaper",
            id: id.to_string(),
        })?;

    let document = state.renderer.render_question_paper(&paper).await?;

    download::send_document(
        &state.config.upload_dir,
        &format!("question-paper-{id}"),
        document,
    )
    .await
}

/// Delete a paper owned by the caller (DELETE /api/questions/{id}).
pub async fn delete_paper(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;

    state.papers.delete_paper(id, user.id).await?;

    tracing::info!(paper_id = %id, "Deleted question paper");

    Ok(Json(serde_json::json!({
        "message": "Question paper deleted successfully",
    })))
}
