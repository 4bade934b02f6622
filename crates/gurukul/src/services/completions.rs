//! Chat-completions client for generation and grading.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use gurukul_core::classroom::{Evaluation, Question};
use gurukul_core::services::{
    parse, prompts, Completions, EvaluationSpec, NotesSpec, PaperSpec, Result, ServiceError,
};

const SERVICE: &str = "completions";

/// Sampling temperature for generation requests.
const GENERATION_TEMPERATURE: f64 = 0.7;
/// Lower temperature for grading keeps marks consistent.
const EVALUATION_TEMPERATURE: f64 = 0.5;

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct HttpCompletions {
    http: reqwest::Client,
    url: Url,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl HttpCompletions {
    pub fn new(url: Url, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            api_key,
            model,
        }
    }

    /// Sends one system+user exchange and returns the completion text.
    async fn complete(&self, system: &str, user: &str, temperature: f64) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
        };

        let response = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
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

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::invalid_response(SERVICE, err.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::invalid_response(SERVICE, "completion had no choices"))
    }
}

#[async_trait]
impl Completions for HttpCompletions {
    async fn generate_questions(&self, spec: &PaperSpec) -> Result<Vec<Question>> {
        let content = self
            .complete(
                prompts::QUESTION_SYSTEM_PROMPT,
                &prompts::question_paper_prompt(spec),
                GENERATION_TEMPERATURE,
            )
            .await?;
        parse::questions_from_completion(&content)
    }

    async fn generate_notes(&self, spec: &NotesSpec) -> Result<String> {
        self.complete(
            prompts::NOTES_SYSTEM_PROMPT,
            &prompts::notes_prompt(spec),
            GENERATION_TEMPERATURE,
        )
        .await
    }

    async fn evaluate_answer(&self, spec: &EvaluationSpec) -> Result<Evaluation> {
        let content = self
            .complete(
                prompts::EVALUATION_SYSTEM_PROMPT,
                &prompts::evaluation_prompt(spec),
                EVALUATION_TEMPERATURE,
            )
            .await?;
        parse::evaluation_from_completion(&content)
    }
}
