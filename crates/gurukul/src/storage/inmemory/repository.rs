//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use gurukul_core::classroom::{AnswerSheet, Notes, QuestionPaper, StudentPerformance, User};
use gurukul_core::storage::{
    AnswerSheetRepository, NotesRepository, Page, Paginated, PaperRepository,
    PerformanceFilter, PerformanceRepository, RepositoryError, Result, SheetFilter,
    UserRepository,
};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    papers: Arc<RwLock<HashMap<Uuid, QuestionPaper>>>,
    notes: Arc<RwLock<HashMap<Uuid, Notes>>>,
    sheets: Arc<RwLock<HashMap<Uuid, AnswerSheet>>>,
    records: Arc<RwLock<HashMap<Uuid, StudentPerformance>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts newest first and slices out the requested page.
fn paginate<T>(
    mut items: Vec<T>,
    page: Page,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Paginated<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit as usize)
        .collect();
    Paginated { items, total }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl PaperRepository for InMemoryRepository {
    async fn get_paper(&self, id: Uuid) -> Result<Option<QuestionPaper>> {
        let papers = self.papers.read().await;
        Ok(papers.get(&id).cloned())
    }

    async fn list_papers(&self, teacher_id: Uuid, page: Page) -> Result<Paginated<QuestionPaper>> {
        let papers = self.papers.read().await;
        let mine: Vec<QuestionPaper> = papers
            .values()
            .filter(|paper| paper.teacher_id == teacher_id)
            .cloned()
            .collect();
        Ok(paginate(mine, page, |paper| paper.created_at))
    }

    async fn create_paper(&self, paper: &QuestionPaper) -> Result<()> {
        let mut papers = self.papers.write().await;
        if papers.contains_key(&paper.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "QuestionPaper",
                id: paper.id.to_string(),
            });
        }
        papers.insert(paper.id, paper.clone());
        Ok(())
    }

    async fn delete_paper(&self, id: Uuid, teacher_id: Uuid) -> Result<()> {
        let mut papers = self.papers.write().await;
        let owned = papers
            .get(&id)
            .is_some_and(|paper| paper.teacher_id == teacher_id);
        if !owned {
            return Err(RepositoryError::NotFound {
                entity_type: "QuestionPaper",
                id: id.to_string(),
            });
        }
        papers.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl NotesRepository for InMemoryRepository {
    async fn get_notes(&self, id: Uuid) -> Result<Option<Notes>> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).cloned())
    }

    async fn list_notes(&self, teacher_id: Uuid, page: Page) -> Result<Paginated<Notes>> {
        let notes = self.notes.read().await;
        let mine: Vec<Notes> = notes
            .values()
            .filter(|notes| notes.teacher_id == teacher_id)
            .cloned()
            .collect();
        Ok(paginate(mine, page, |notes| notes.created_at))
    }

    async fn create_notes(&self, notes: &Notes) -> Result<()> {
        let mut store = self.notes.write().await;
        if store.contains_key(&notes.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Notes",
                id: notes.id.to_string(),
            });
        }
        store.insert(notes.id, notes.clone());
        Ok(())
    }

    async fn delete_notes(&self, id: Uuid, teacher_id: Uuid) -> Result<()> {
        let mut store = self.notes.write().await;
        let owned = store
            .get(&id)
            .is_some_and(|notes| notes.teacher_id == teacher_id);
        if !owned {
            return Err(RepositoryError::NotFound {
                entity_type: "Notes",
                id: id.to_string(),
            });
        }
        store.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AnswerSheetRepository for InMemoryRepository {
    async fn get_sheet(&self, id: Uuid) -> Result<Option<AnswerSheet>> {
        let sheets = self.sheets.read().await;
        Ok(sheets.get(&id).cloned())
    }

    async fn list_sheets(&self, filter: SheetFilter, page: Page) -> Result<Paginated<AnswerSheet>> {
        let sheets = self.sheets.read().await;
        let matching: Vec<AnswerSheet> = sheets
            .values()
            .filter(|sheet| sheet.teacher_id == filter.teacher_id)
            .filter(|sheet| filter.status.is_none_or(|status| sheet.status == status))
            .cloned()
            .collect();
        Ok(paginate(matching, page, |sheet| sheet.created_at))
    }

    async fn create_sheet(&self, sheet: &AnswerSheet) -> Result<()> {
        let mut sheets = self.sheets.write().await;
        if sheets.contains_key(&sheet.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "AnswerSheet",
                id: sheet.id.to_string(),
            });
        }
        sheets.insert(sheet.id, sheet.clone());
        Ok(())
    }

    async fn update_sheet(&self, sheet: &AnswerSheet) -> Result<()> {
        let mut sheets = self.sheets.write().await;
        if !sheets.contains_key(&sheet.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "AnswerSheet",
                id: sheet.id.to_string(),
            });
        }
        sheets.insert(sheet.id, sheet.clone());
        Ok(())
    }
}

#[async_trait]
impl PerformanceRepository for InMemoryRepository {
    async fn get_record(&self, id: Uuid) -> Result<Option<StudentPerformance>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list_records(
        &self,
        filter: &PerformanceFilter,
        page: Page,
    ) -> Result<Paginated<StudentPerformance>> {
        let records = self.records.read().await;
        let matching: Vec<StudentPerformance> = records
            .values()
            .filter(|record| {
                filter
                    .student_id
                    .is_none_or(|student_id| record.student_id == student_id)
            })
            .filter(|record| {
                filter
                    .subject
                    .as_deref()
                    .is_none_or(|subject| record.subject == subject)
            })
            .cloned()
            .collect();
        Ok(paginate(matching, page, |record| record.created_at))
    }

    async fn records_for_student(&self, student_id: Uuid) -> Result<Vec<StudentPerformance>> {
        let records = self.records.read().await;
        let mut matching: Vec<StudentPerformance> = records
            .values()
            .filter(|record| record.student_id == student_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn create_record(&self, record: &StudentPerformance) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "StudentPerformance",
                id: record.id.to_string(),
            });
        }
        records.insert(record.id, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gurukul_core::classroom::Difficulty;

    fn paper_for(teacher_id: Uuid, age_days: i64) -> QuestionPaper {
        let mut paper = QuestionPaper::new(
            teacher_id,
            "CBSE",
            9,
            "Mathematics",
            "Polynomials",
            Difficulty::Medium,
            Vec::new(),
        );
        paper.created_at = Utc::now() - Duration::days(age_days);
        paper
    }

    fn record_for(student_id: Uuid, subject: &str, age_days: i64) -> StudentPerformance {
        StudentPerformance::new(
            student_id,
            subject,
            format!("test-{age_days}"),
            40.0,
            50.0,
            Vec::new(),
            "",
            Uuid::new_v4(),
        )
        .with_created_at(Utc::now() - Duration::days(age_days))
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryRepository::new();
        let first = User::new("A", "same@example.com", "hash".to_string());
        let second = User::new("B", "same@example.com", "hash".to_string());

        repo.create_user(&first).await.unwrap();
        let err = repo.create_user(&second).await.unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let repo = InMemoryRepository::new();
        let user = User::new("A", "a@example.com", "hash".to_string());
        repo.create_user(&user).await.unwrap();

        let found = repo.get_user_by_email("a@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let missing = repo.get_user_by_email("b@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_papers_is_paginated_newest_first() {
        let repo = InMemoryRepository::new();
        let teacher_id = Uuid::new_v4();
        for age in 0..5 {
            repo.create_paper(&paper_for(teacher_id, age)).await.unwrap();
        }
        // Another teacher's paper must not show up.
        repo.create_paper(&paper_for(Uuid::new_v4(), 0)).await.unwrap();

        let page = repo.list_papers(teacher_id, Page::new(1, 2)).await.unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].created_at >= page.items[1].created_at);

        let last = repo.list_papers(teacher_id, Page::new(3, 2)).await.unwrap();
        assert_eq!(last.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_paper_requires_ownership() {
        let repo = InMemoryRepository::new();
        let teacher_id = Uuid::new_v4();
        let paper = paper_for(teacher_id, 0);
        repo.create_paper(&paper).await.unwrap();

        let err = repo.delete_paper(paper.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        repo.delete_paper(paper.id, teacher_id).await.unwrap();
        assert!(repo.get_paper(paper.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sheet_status_filter() {
        let repo = InMemoryRepository::new();
        let teacher_id = Uuid::new_v4();

        let mut pending = AnswerSheet::new(
            Uuid::new_v4(),
            teacher_id,
            "Physics",
            "uploads/a.png",
            "text",
            Default::default(),
        );
        pending.status = gurukul_core::classroom::SheetStatus::Pending;
        let checked = AnswerSheet::new(
            Uuid::new_v4(),
            teacher_id,
            "Physics",
            "uploads/b.png",
            "text",
            Default::default(),
        );
        repo.create_sheet(&pending).await.unwrap();
        repo.create_sheet(&checked).await.unwrap();

        let filter = SheetFilter {
            teacher_id,
            status: Some(gurukul_core::classroom::SheetStatus::Pending),
        };
        let result = repo.list_sheets(filter, Page::default()).await.unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].id, pending.id);
    }

    #[tokio::test]
    async fn test_performance_filters_and_student_ordering() {
        let repo = InMemoryRepository::new();
        let student = Uuid::new_v4();

        repo.create_record(&record_for(student, "Mathematics", 2))
            .await
            .unwrap();
        repo.create_record(&record_for(student, "Physics", 1))
            .await
            .unwrap();
        repo.create_record(&record_for(Uuid::new_v4(), "Mathematics", 0))
            .await
            .unwrap();

        let filter = PerformanceFilter {
            student_id: Some(student),
            subject: Some("Mathematics".to_string()),
        };
        let result = repo.list_records(&filter, Page::default()).await.unwrap();
        assert_eq!(result.total, 1);

        let history = repo.records_for_student(student).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert!(history[0].created_at > history[1].created_at);
    }
}
