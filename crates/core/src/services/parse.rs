//! Parsing of completion text into typed values.
//!
//! Models often wrap JSON in markdown code fences despite being told
//! not to. The extractors here strip an optional fence before
//! validating against the expected schema; anything that still fails
//! becomes [`ServiceError::MalformedCompletion`].

use serde::de::DeserializeOwned;

use crate::classroom::{Evaluation, Question};

use super::{Result, ServiceError};

/// Returns the JSON payload of a completion, stripping one optional
/// markdown code fence (with or without a `json` info string).
pub fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };

    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn parse_completion<T: DeserializeOwned>(content: &str, expected: &str) -> Result<T> {
    let json = extract_json(content);
    serde_json::from_str(json)
        .map_err(|err| ServiceError::MalformedCompletion(format!("expected {expected}: {err}")))
}

/// Parses a question-generation completion into questions.
pub fn questions_from_completion(content: &str) -> Result<Vec<Question>> {
    let questions: Vec<Question> = parse_completion(content, "a question array")?;
    if questions.is_empty() {
        return Err(ServiceError::MalformedCompletion(
            "completion contained no questions".to_string(),
        ));
    }
    Ok(questions)
}

/// Parses a grading completion into an evaluation.
pub fn evaluation_from_completion(content: &str) -> Result<Evaluation> {
    parse_completion(content, "an evaluation object")
}
