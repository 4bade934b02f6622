//! Prompt construction for the completions collaborator.
//!
//! Prompts pin down the output contract (counts, marks, JSON shape) so
//! completions can be parsed with [`crate::services::parse`].

use super::{EvaluationSpec, NotesSpec, PaperSpec};

/// System prompt used when generating question papers.
pub const QUESTION_SYSTEM_PROMPT: &str = "You are an expert Indian curriculum teacher.";

/// System prompt used when generating notes.
pub const NOTES_SYSTEM_PROMPT: &str = "You are an expert teacher creating study notes.";

/// System prompt used when grading answers.
pub const EVALUATION_SYSTEM_PROMPT: &str =
    "You are an experienced teacher evaluating student answers.";

/// Builds the user prompt for question-paper generation.
pub fn question_paper_prompt(spec: &PaperSpec) -> String {
    format!(
        "You are an expert Indian curriculum teacher for {board} board.\n\
         Generate {difficulty} level questions for Class {class}, {subject}, Chapter: {chapter}.\n\
         \n\
         Requirements:\n\
         - Generate 5 MCQs (4 options each, 1 mark each)\n\
         - Generate 3 short answer questions (2-3 marks each)\n\
         - Generate 2 long answer questions (5 marks each)\n\
         - Questions should align with Bloom's Taxonomy (Remember, Understand, Apply, Analyze)\n\
         - Language: {language}\n\
         - Format: JSON array with structure: {{type, question, options, answer, marks, bloom_level}}\n\
         \n\
         Make questions relevant to Indian students and NCERT/state curriculum.\n\
         \n\
         Return ONLY a valid JSON array, no additional text.",
        board = spec.board,
        difficulty = spec.difficulty.as_str(),
        class = spec.class_level,
        subject = spec.subject,
        chapter = spec.chapter,
        language = spec.language.display_name(),
    )
}

/// Builds the user prompt for notes generation.
pub fn notes_prompt(spec: &NotesSpec) -> String {
    format!(
        "You are an expert teacher creating study notes for Indian students.\n\
         Create comprehensive notes for Class {class}, {subject}, Chapter: {chapter}.\n\
         \n\
         Requirements:\n\
         - Simple, student-friendly language\n\
         - Bullet points for key concepts\n\
         - Include 2-3 examples for each concept\n\
         - Include important formulas/definitions\n\
         - Suggest diagrams or tables where helpful\n\
         - Language: {language}\n\
         - Keep it concise but complete\n\
         \n\
         Target audience: {board} board students, ages 11-18.",
        class = spec.class_level,
        subject = spec.subject,
        chapter = spec.chapter,
        language = spec.language.display_name(),
        board = spec.board,
    )
}

/// Builds the user prompt for grading one answer.
pub fn evaluation_prompt(spec: &EvaluationSpec) -> String {
    format!(
        "You are an experienced teacher evaluating a student's answer.\n\
         \n\
         Question: {question}\n\
         Model Answer: {model_answer}\n\
         Student's Answer: {student_answer}\n\
         Total Marks: {total_marks}\n\
         \n\
         Please provide a JSON response with:\n\
         1. marks (number): Marks awarded (out of {total_marks})\n\
         2. feedback (string): Constructive feedback (2-3 sentences)\n\
         3. topic_mistakes (array of strings): List key topics where student needs improvement\n\
         \n\
         Be encouraging but honest. Use simple language.\n\
         \n\
         Return ONLY a valid JSON object, no additional text.",
        question = spec.question,
        model_answer = spec.model_answer,
        student_answer = spec.student_answer,
        total_marks = spec.total_marks,
    )
}
