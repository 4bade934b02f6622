//! Deterministic collaborator doubles for tests and sidecar-free runs.

use std::path::Path;

use async_trait::async_trait;

use gurukul_core::classroom::{
    BloomLevel, Evaluation, Notes, Question, QuestionPaper, QuestionType, StudentPerformance,
};
use gurukul_core::services::{
    Completions, DocumentRenderer, EvaluationSpec, NotesSpec, OcrEngine, OcrText, PaperSpec,
    RenderedDocument, Result, ServiceError,
};

/// Canned completions client.
///
/// With `malformed` set, every structured call returns prose instead of
/// JSON, exercising the malformed-completion path end to end.
#[derive(Debug, Default)]
pub struct MockCompletions {
    pub malformed: bool,
}

fn sample_questions(spec: &PaperSpec) -> Vec<Question> {
    vec![
        Question {
            kind: QuestionType::Mcq,
            text: format!("Which concept from {} is fundamental?", spec.chapter),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            answer: "Option A".to_string(),
            marks: 1,
            bloom_level: BloomLevel::Remember,
        },
        Question {
            kind: QuestionType::Short,
            text: format!("Briefly explain one idea from {}.", spec.chapter),
            options: Vec::new(),
            answer: "A concise explanation.".to_string(),
            marks: 2,
            bloom_level: BloomLevel::Understand,
        },
        Question {
            kind: QuestionType::Long,
            text: format!("Discuss {} in detail with examples.", spec.chapter),
            options: Vec::new(),
            answer: "A detailed discussion.".to_string(),
            marks: 5,
            bloom_level: BloomLevel::Apply,
        },
    ]
}

#[async_trait]
impl Completions for MockCompletions {
    async fn generate_questions(&self, spec: &PaperSpec) -> Result<Vec<Question>> {
        if self.malformed {
            return Err(ServiceError::MalformedCompletion(
                "expected a question array: got prose".to_string(),
            ));
        }
        Ok(sample_questions(spec))
    }

    async fn generate_notes(&self, spec: &NotesSpec) -> Result<String> {
        Ok(format!(
            "# {chapter}\n\nKey points for Class {class} {subject}.\n\n\
             - First concept\n- Second concept",
            chapter = spec.chapter,
            class = spec.class_level,
            subject = spec.subject,
        ))
    }

    async fn evaluate_answer(&self, spec: &EvaluationSpec) -> Result<Evaluation> {
        if self.malformed {
            return Err(ServiceError::MalformedCompletion(
                "expected an evaluation object: got prose".to_string(),
            ));
        }
        Ok(Evaluation {
            marks: spec.total_marks as f64 / 2.0,
            feedback: "Partially correct; revise the key definitions.".to_string(),
            topic_mistakes: vec!["Definitions".to_string()],
        })
    }
}

/// Canned OCR engine.
#[derive(Debug)]
pub struct MockOcr {
    pub text: String,
    pub confidence: f64,
}

impl Default for MockOcr {
    fn default() -> Self {
        Self {
            text: "The mitochondria is the powerhouse of the cell.".to_string(),
            confidence: 87.5,
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn recognize(&self, _image: &Path) -> Result<OcrText> {
        Ok(OcrText {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

/// Canned renderer producing tiny placeholder documents.
#[derive(Debug, Default)]
pub struct MockRenderer;

#[async_trait]
impl DocumentRenderer for MockRenderer {
    async fn render_question_paper(&self, paper: &QuestionPaper) -> Result<RenderedDocument> {
        Ok(RenderedDocument::pdf(
            format!("%PDF-1.4 question paper {}", paper.id).into_bytes(),
        ))
    }

    async fn render_performance_report(
        &self,
        record: &StudentPerformance,
    ) -> Result<RenderedDocument> {
        Ok(RenderedDocument::pdf(
            format!("%PDF-1.4 performance report {}", record.id).into_bytes(),
        ))
    }

    async fn render_notes_deck(&self, notes: &Notes) -> Result<RenderedDocument> {
        Ok(RenderedDocument::pptx(
            format!("PK notes deck {}", notes.id).into_bytes(),
        ))
    }
}
