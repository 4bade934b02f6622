//! Answer sheet handlers: upload + auto-grading, listing, manual
//! evaluation updates.

use std::path::Path as FilePath;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use gurukul_core::classroom::{AnswerSheet, SheetStatus, UpdateEvaluation};
use gurukul_core::services::EvaluationSpec;
use gurukul_core::storage::{
    default_limit, default_page, Page, Pagination, RepositoryError, SheetFilter,
};

use crate::{extractors::CurrentUser, state::AppState};

use super::{authz::require_staff, AppError};

/// Query parameters for listing answer sheets.
#[derive(Debug, Deserialize)]
pub struct ListSheetsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<SheetStatus>,
}

/// Text fields accompanying the uploaded image.
#[derive(Debug, Default)]
struct UploadFields {
    student_id: Option<Uuid>,
    subject: Option<String>,
    question: Option<String>,
    model_answer: Option<String>,
    total_marks: Option<u32>,
    image: Option<(String, Vec<u8>)>,
}

impl UploadFields {
    fn require(self) -> Result<(Uuid, String, String, String, u32, (String, Vec<u8>)), AppError> {
        let image = self.image.ok_or_else(|| AppError::bad_request("No file uploaded"))?;
        let student_id = self
            .student_id
            .ok_or_else(|| AppError::bad_request("student_id is required"))?;
        let subject = self
            .subject
            .ok_or_else(|| AppError::bad_request("subject is required"))?;
        let question = self
            .question
            .ok_or_else(|| AppError::bad_request("question is required"))?;
        let model_answer = self
            .model_answer
            .ok_or_else(|| AppError::bad_request("model_answer is required"))?;
        let total_marks = self
            .total_marks
            .ok_or_else(|| AppError::bad_request("total_marks is required"))?;
        Ok((student_id, subject, question, model_answer, total_marks, image))
    }
}

async fn collect_fields(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("Failed to parse form: {err}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "answer_sheet" => {
                let extension = field
                    .file_name()
                    .and_then(|f| FilePath::new(f).extension())
                    .and_then(|e| e.to_str())
                    .unwrap_or("png")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::bad_request(format!("Failed to read file: {err}")))?;
                fields.image = Some((extension, bytes.to_vec()));
            }
            "student_id" => {
                let text = read_text(field).await?;
                let id = text
                    .parse()
                    .map_err(|_| AppError::bad_request("student_id must be a UUID"))?;
                fields.student_id = Some(id);
            }
            "subject" => fields.subject = Some(read_text(field).await?),
            "question" => fields.question = Some(read_text(field).await?),
            "model_answer" => fields.model_answer = Some(read_text(field).await?),
            "total_marks" => {
                let text = read_text(field).await?;
                let marks = text
                    .parse()
                    .map_err(|_| AppError::bad_request("total_marks must be a number"))?;
                fields.total_marks = Some(marks);
            }
            _ => {}
        }
    }

    Ok(fields)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|err| AppError::bad_request(format!("Failed to read field: {err}")))
}

/// Upload and auto-grade an answer sheet (POST /api/answers).
///
/// The image is stored, OCR'd, and the extracted text graded against
/// the model answer. A failed OCR or grading call fails the whole
/// request; nothing is persisted in that case.
pub async fn upload_sheet(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;

    let fields = collect_fields(multipart).await?;
    let (student_id, subject, question, model_answer, total_marks, (extension, bytes)) =
        fields.require()?;

    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let image_path = state
        .config
        .upload_dir
        .join(format!("answer-{}.{extension}", Uuid::new_v4()));
    tokio::fs::write(&image_path, &bytes).await?;

    let ocr = state.ocr.recognize(&image_path).await?;

    let evaluation = state
        .completions
        .evaluate_answer(&EvaluationSpec {
            question,
            model_answer,
            student_answer: ocr.text.clone(),
            total_marks,
        })
        .await?;

    let sheet = AnswerSheet::new(
        student_id,
        user.id,
        subject,
        image_path.to_string_lossy(),
        ocr.text,
        evaluation,
    );
    state.sheets.create_sheet(&sheet).await?;

    tracing::info!(
        sheet_id = %sheet.id,
        student_id = %student_id,
        marks = sheet.evaluation.marks,
        "Processed answer sheet"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Answer sheet processed successfully",
            "answerSheet": sheet,
            "ocr_confidence": ocr.confidence,
        })),
    ))
}

/// List the teacher's answer sheets (GET /api/answers).
pub async fn list_sheets(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListSheetsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;

    let page = Page::new(query.page, query.limit);
    let filter = SheetFilter {
        teacher_id: user.id,
        status: query.status,
    };
    let result = state.sheets.list_sheets(filter, page).await?;

    Ok(Json(serde_json::json!({
        "answerSheets": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

/// Get a single answer sheet by ID (GET /api/answers/{id}).
pub async fn get_sheet(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sheet = state
        .sheets
        .get_sheet(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "AnswerSheet",
            id: id.to_string(),
        })?;

    Ok(Json(serde_json::json!({ "answerSheet": sheet })))
}

/// Override an answer sheet's evaluation (PUT /api/answers/{id}).
pub async fn update_evaluation(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateEvaluation>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&user)?;
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let mut sheet = state
        .sheets
        .get_sheet(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "AnswerSheet",
            id: id.to_string(),
        })?;

    sheet.apply_evaluation(gurukul_core::classroom::Evaluation {
        marks: payload.marks,
        feedback: payload.feedback,
        topic_mistakes: payload.topic_mistakes,
    });
    state.sheets.update_sheet(&sheet).await?;

    tracing::info!(sheet_id = %id, marks = sheet.evaluation.marks, "Updated evaluation");

    Ok(Json(serde_json::json!({
        "message": "Evaluation updated successfully",
        "answerSheet": sheet,
    })))
}
