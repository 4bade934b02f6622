//! Domain types for the teaching workflows.
//!
//! Covers users, generated question papers, study notes, scanned answer
//! sheets, and per-test performance records.

mod error;
mod requests;
mod types;
mod validation;

pub use error::ValidationError;
pub use requests::{
    CreatePerformance, GenerateNotes, GeneratePaper, LoginUser, RegisterUser, UpdateEvaluation,
    UpdateProfile,
};
pub use types::{
    AnswerSheet, BloomLevel, Difficulty, Evaluation, Language, Notes, Question, QuestionPaper,
    QuestionType, Role, SheetStatus, StudentPerformance, SubscriptionTier, TopicMarks, User,
};
pub use validation::{validate_class_level, validate_email, validate_password};
