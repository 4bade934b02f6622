//! Performance record handlers: recording, listing, analytics, export.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use gurukul_core::analytics::summarize;
use gurukul_core::classroom::{CreatePerformance, StudentPerformance};
use gurukul_core::storage::{
    default_limit, default_page, Page, Pagination, PerformanceFilter, RepositoryError,
};

use crate::{extractors::CurrentUser, state::AppState};

use super::{authz::require_staff, download, AppError};

/// Query parameters for listing performance records.
#[derive(Debug, Deserialize)]
pub struct ListRecordsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub student_id: Option<Uuid>,
    pub subject: Option<String>,
}

/// Record a test result (POST /api/performance).
pub async fn create_record(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePerformance>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;
    let Json(payload) =
        payload.map_err(|err| AppError::bad_request(format!("Failed to parse body: {err}")))?;
    payload.validate()?;

    let record = StudentPerformance::new(
        payload.student_id,
        payload.subject,
        payload.test_name,
        payload.marks_obtained,
        payload.total_marks,
        payload.topic_wise_performance.unwrap_or_default(),
        payload.feedback.unwrap_or_default(),
        user.id,
    );
    state.performance.create_record(&record).await?;

    tracing::info!(
        record_id = %record.id,
        student_id = %record.student_id,
        test = %record.test_name,
        "Created performance record"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Performance record created successfully",
            "performance": record,
        })),
    ))
}

/// List performance records (GET /api/performance).
pub async fn list_records(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = Page::new(query.page, query.limit);
    let filter = PerformanceFilter {
        student_id: query.student_id,
        subject: query.subject,
    };
    let result = state.performance.list_records(&filter, page).await?;

    Ok(Json(serde_json::json!({
        "performances": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

/// Analytics summary for one student (GET /api/performance/student/{id}).
pub async fn student_analytics(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Records arrive newest first; the aggregator depends on that.
    let records = state.performance.records_for_student(student_id).await?;
    let summary = summarize(&records);

    Ok(Json(serde_json::json!({
        "student_id": student_id,
        "total_tests": summary.total_tests,
        "average_percentage": summary.average_percentage,
        "strong_topics": summary.strong_topics,
        "weak_topics": summary.weak_topics,
        "progress": summary.progress,
    })))
}

/// Export a performance report as a PDF (GET /api/performance/{id}/export).
pub async fn export_report(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = state
        .performance
        .get_record(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "StudentPerformance",
            id: id.to_string(),
        })?;

    let document = state.renderer.render_performance_report(&record).await?;

    download::send_document(
        &state.config.upload_dir,
        &format!("performance-report-{id}"),
        document,
    )
    .await
}
