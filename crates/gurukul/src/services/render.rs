//! Document-render sidecar client.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use gurukul_core::classroom::{Notes, QuestionPaper, StudentPerformance};
use gurukul_core::services::{DocumentRenderer, RenderedDocument, Result, ServiceError};

const SERVICE: &str = "renderer";

/// Client for an HTTP rendering service: the record is posted as JSON
/// and the response body is the finished document.
pub struct HttpRenderer {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRenderer {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn render<T: Serialize + Sync>(&self, route: &str, payload: &T) -> Result<Vec<u8>> {
        let url = self
            .base_url
            .join(route)
            .map_err(|err| ServiceError::http(SERVICE, err.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|err| ServiceError::http(SERVICE, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ServiceError::invalid_response(SERVICE, err.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DocumentRenderer for HttpRenderer {
    async fn render_question_paper(&self, paper: &QuestionPaper) -> Result<RenderedDocument> {
        let bytes = self.render("render/question-paper", paper).await?;
        Ok(RenderedDocument::pdf(bytes))
    }

    async fn render_performance_report(
        &self,
        record: &StudentPerformance,
    ) -> Result<RenderedDocument> {
        let bytes = self.render("render/performance-report", record).await?;
        Ok(RenderedDocument::pdf(bytes))
    }

    async fn render_notes_deck(&self, notes: &Notes) -> Result<RenderedDocument> {
        let bytes = self.render("render/notes-deck", notes).await?;
        Ok(RenderedDocument::pptx(bytes))
    }
}
