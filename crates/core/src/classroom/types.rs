use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Determines which routes a user may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Admin,
    Student,
}

impl Role {
    /// Returns true for roles allowed to create and grade content.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Teacher
    }
}

/// Content language for generated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// Human-readable name used when building prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
        }
    }
}

/// Subscription tier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    School,
}

/// Length of the free trial granted at registration.
const TRIAL_DAYS: i64 = 30;

/// A registered account: teacher, admin, or student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 hash. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub subjects: Vec<String>,
    /// Class levels taught, each in 6..=12.
    pub classes: Vec<u8>,
    pub language_preference: Language,
    pub subscription_tier: SubscriptionTier,
    pub trial_ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a freshly started trial.
    /// Email is stored lowercased so uniqueness checks are case-insensitive.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            password_hash,
            phone: None,
            role: Role::default(),
            subjects: Vec::new(),
            classes: Vec::new(),
            language_preference: Language::default(),
            subscription_tier: SubscriptionTier::default(),
            trial_ends_at: now + Duration::days(TRIAL_DAYS),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the role for this user.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Question format within a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Short,
    Long,
}

/// Bloom's taxonomy tag for the cognitive skill a question targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    Remember,
    #[default]
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

/// Requested difficulty for a generated paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lowercase name used in prompts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A single question inside a generated paper.
///
/// The serialized shape matches what the completions collaborator is
/// asked to emit, so parsed completions deserialize straight into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(rename = "question")]
    pub text: String,
    /// MCQ options; empty for short/long answers.
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    pub marks: u32,
    #[serde(default)]
    pub bloom_level: BloomLevel,
}

/// Default paper duration in minutes.
const DEFAULT_DURATION_MINUTES: u32 = 180;

/// A generated question paper. Immutable after creation except deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPaper {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub board: String,
    #[serde(rename = "class")]
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    /// Sum of the marks of all questions.
    pub total_marks: u32,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
}

impl QuestionPaper {
    /// Creates a paper from generated questions, deriving total marks.
    pub fn new(
        teacher_id: Uuid,
        board: impl Into<String>,
        class_level: u8,
        subject: impl Into<String>,
        chapter: impl Into<String>,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Self {
        let total_marks = questions.iter().map(|q| q.marks).sum();
        Self {
            id: Uuid::new_v4(),
            teacher_id,
            board: board.into(),
            class_level,
            subject: subject.into(),
            chapter: chapter.into(),
            difficulty,
            questions,
            total_marks,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this paper (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Generated study notes for one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notes {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub board: String,
    #[serde(rename = "class")]
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    pub content: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl Notes {
    pub fn new(
        teacher_id: Uuid,
        board: impl Into<String>,
        class_level: u8,
        subject: impl Into<String>,
        chapter: impl Into<String>,
        content: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            teacher_id,
            board: board.into(),
            class_level,
            subject: subject.into(),
            chapter: chapter.into(),
            content: content.into(),
            language,
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for these notes (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Grading result attached to an answer sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Evaluation {
    pub marks: f64,
    pub feedback: String,
    /// Topics the student should revisit.
    #[serde(default)]
    pub topic_mistakes: Vec<String>,
}

/// Processing state of an uploaded answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    #[default]
    Pending,
    Checked,
}

/// A scanned answer sheet with its OCR text and evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub subject: String,
    /// Where the uploaded image was stored.
    pub image_path: String,
    pub extracted_text: String,
    pub evaluation: Evaluation,
    pub status: SheetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnswerSheet {
    pub fn new(
        student_id: Uuid,
        teacher_id: Uuid,
        subject: impl Into<String>,
        image_path: impl Into<String>,
        extracted_text: impl Into<String>,
        evaluation: Evaluation,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            teacher_id,
            subject: subject.into(),
            image_path: image_path.into(),
            extracted_text: extracted_text.into(),
            evaluation,
            status: SheetStatus::Checked,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the evaluation and marks the sheet checked.
    pub fn apply_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = evaluation;
        self.status = SheetStatus::Checked;
        self.updated_at = Utc::now();
    }
}

/// Marks earned on one topic within a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMarks {
    pub topic: String,
    pub marks: f64,
    pub total: f64,
}

/// One test result for one student. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPerformance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub test_name: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub topic_wise_performance: Vec<TopicMarks>,
    pub feedback: String,
    /// The teacher or admin who recorded the result.
    pub checked_by: Uuid,
    pub checked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StudentPerformance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        student_id: Uuid,
        subject: impl Into<String>,
        test_name: impl Into<String>,
        marks_obtained: f64,
        total_marks: f64,
        topic_wise_performance: Vec<TopicMarks>,
        feedback: impl Into<String>,
        checked_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            subject: subject.into(),
            test_name: test_name.into(),
            marks_obtained,
            total_marks,
            topic_wise_performance,
            feedback: feedback.into(),
            checked_by,
            checked_at: now,
            created_at: now,
        }
    }

    /// Sets a specific creation time (useful for testing ordering).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
