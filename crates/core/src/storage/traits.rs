use async_trait::async_trait;
use uuid::Uuid;

use crate::classroom::{AnswerSheet, Notes, QuestionPaper, StudentPerformance, User};

use super::{Page, Paginated, PerformanceFilter, Result, SheetFilter};

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address (stored lowercased).
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Repository for generated question papers.
#[async_trait]
pub trait PaperRepository: Send + Sync {
    /// Gets a paper by its ID.
    async fn get_paper(&self, id: Uuid) -> Result<Option<QuestionPaper>>;

    /// Lists a teacher's papers, newest first.
    async fn list_papers(&self, teacher_id: Uuid, page: Page) -> Result<Paginated<QuestionPaper>>;

    /// Creates a new paper.
    async fn create_paper(&self, paper: &QuestionPaper) -> Result<()>;

    /// Deletes a paper owned by the given teacher.
    async fn delete_paper(&self, id: Uuid, teacher_id: Uuid) -> Result<()>;
}

/// Repository for generated study notes.
#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// Gets notes by their ID.
    async fn get_notes(&self, id: Uuid) -> Result<Option<Notes>>;

    /// Lists a teacher's notes, newest first.
    async fn list_notes(&self, teacher_id: Uuid, page: Page) -> Result<Paginated<Notes>>;

    /// Creates new notes.
    async fn create_notes(&self, notes: &Notes) -> Result<()>;

    /// Deletes notes owned by the given teacher.
    async fn delete_notes(&self, id: Uuid, teacher_id: Uuid) -> Result<()>;
}

/// Repository for scanned answer sheets.
#[async_trait]
pub trait AnswerSheetRepository: Send + Sync {
    /// Gets a sheet by its ID.
    async fn get_sheet(&self, id: Uuid) -> Result<Option<AnswerSheet>>;

    /// Lists a teacher's sheets, newest first, optionally by status.
    async fn list_sheets(&self, filter: SheetFilter, page: Page) -> Result<Paginated<AnswerSheet>>;

    /// Creates a new sheet.
    async fn create_sheet(&self, sheet: &AnswerSheet) -> Result<()>;

    /// Updates an existing sheet.
    async fn update_sheet(&self, sheet: &AnswerSheet) -> Result<()>;
}

/// Repository for per-test performance records.
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// Gets a record by its ID.
    async fn get_record(&self, id: Uuid) -> Result<Option<StudentPerformance>>;

    /// Lists records matching the filter, newest first.
    async fn list_records(
        &self,
        filter: &PerformanceFilter,
        page: Page,
    ) -> Result<Paginated<StudentPerformance>>;

    /// All records for one student, newest first (analytics input).
    async fn records_for_student(&self, student_id: Uuid) -> Result<Vec<StudentPerformance>>;

    /// Creates a new record.
    async fn create_record(&self, record: &StudentPerformance) -> Result<()>;
}
