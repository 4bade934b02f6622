use crate::classroom::{Difficulty, Language};

/// What to generate a question paper about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSpec {
    pub board: String,
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    pub difficulty: Difficulty,
    pub language: Language,
}

/// What to generate study notes about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSpec {
    pub board: String,
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    pub language: Language,
}

/// Inputs for grading one student answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSpec {
    pub question: String,
    pub model_answer: String,
    pub student_answer: String,
    pub total_marks: u32,
}

/// Text recognized from an answer-sheet image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrText {
    pub text: String,
    /// Engine confidence, 0..=100.
    pub confidence: f64,
}

/// A rendered export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

impl RenderedDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: "application/pdf",
            extension: "pdf",
        }
    }

    pub fn pptx(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type:
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            extension: "pptx",
        }
    }
}
