//! OCR sidecar client.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use url::Url;

use gurukul_core::services::{OcrEngine, OcrText, Result, ServiceError};

const SERVICE: &str = "ocr";

/// Languages requested from the engine; answer sheets mix English and Hindi.
const OCR_LANGUAGES: &str = "eng+hin";

/// Client for an HTTP OCR service (image in, text + confidence out).
pub struct HttpOcr {
    http: reqwest::Client,
    url: Url,
}

#[derive(Deserialize)]
struct OcrResponse {
    text: String,
    #[serde(default)]
    confidence: f64,
}

impl HttpOcr {
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl OcrEngine for HttpOcr {
    async fn recognize(&self, image: &Path) -> Result<OcrText> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|err| ServiceError::http(SERVICE, format!("failed to read image: {err}")))?;

        let file_name = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan".to_string());

        let form = multipart::Form::new()
            .part("image", multipart::Part::bytes(bytes).file_name(file_name))
            .text("languages", OCR_LANGUAGES);

        let response = self
            .http
            .post(self.url.clone())
            .multipart(form)
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

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::invalid_response(SERVICE, err.to_string()))?;

        Ok(OcrText {
            text: parsed.text.trim().to_string(),
            confidence: parsed.confidence,
        })
    }
}
