use std::path::Path;

use async_trait::async_trait;

use crate::classroom::{Evaluation, Notes, Question, QuestionPaper, StudentPerformance};

use super::{EvaluationSpec, NotesSpec, OcrText, PaperSpec, RenderedDocument, Result};

/// Text-completion collaborator: generates teaching material and grades answers.
#[async_trait]
pub trait Completions: Send + Sync {
    /// Generates the question list for a paper.
    async fn generate_questions(&self, spec: &PaperSpec) -> Result<Vec<Question>>;

    /// Generates chapter notes as free text.
    async fn generate_notes(&self, spec: &NotesSpec) -> Result<String>;

    /// Grades one student answer against a model answer.
    async fn evaluate_answer(&self, spec: &EvaluationSpec) -> Result<Evaluation>;
}

/// OCR collaborator: extracts text from an answer-sheet image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text in the stored image file.
    async fn recognize(&self, image: &Path) -> Result<OcrText>;
}

/// Document-rendering collaborator: turns records into export files.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders a question paper as a PDF.
    async fn render_question_paper(&self, paper: &QuestionPaper) -> Result<RenderedDocument>;

    /// Renders a performance report as a PDF.
    async fn render_performance_report(
        &self,
        record: &StudentPerformance,
    ) -> Result<RenderedDocument>;

    /// Renders study notes as a slide deck.
    async fn render_notes_deck(&self, notes: &Notes) -> Result<RenderedDocument>;
}
