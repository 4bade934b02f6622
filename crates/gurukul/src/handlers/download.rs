//! Export download flow: temp file, attachment response, cleanup.

use std::path::Path;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use gurukul_core::services::RenderedDocument;

use super::AppError;

/// Writes the rendered document to a temp file under the upload
/// directory, responds with it as an attachment, and deletes the file
/// after the response is built. Cleanup is fire-and-forget: a failed
/// delete is only logged.
pub async fn send_document(
    upload_dir: &Path,
    file_stem: &str,
    document: RenderedDocument,
) -> Result<Response, AppError> {
    let file_name = format!(
        "{file_stem}-{}.{}",
        Utc::now().timestamp_millis(),
        document.extension
    );
    let path = upload_dir.join(&file_name);

    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(&path, &document.bytes).await?;

    let body = tokio::fs::read(&path).await?;

    tokio::spawn(async move {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::error!(path = %path.display(), error = %err, "Failed to delete export file");
        }
    });

    tracing::debug!(file = %file_name, bytes = body.len(), "Streaming export");

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
