//! Request payloads for the HTTP API, with validation and update logic.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::serde::deserialize_optional_string;

use super::validation::{
    validate_class_level, validate_email, validate_marks, validate_non_empty, validate_password,
};
use super::{Difficulty, Language, Role, TopicMarks, User, ValidationError};

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub classes: Option<Vec<u8>>,
    #[serde(default)]
    pub language_preference: Option<Language>,
}

impl RegisterUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_empty("name", &self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        for class_level in self.classes.iter().flatten() {
            validate_class_level(*class_level)?;
        }
        Ok(())
    }

    /// Builds the user record once the password has been hashed.
    pub fn into_user(self, password_hash: String) -> User {
        let mut user = User::new(self.name.trim(), self.email, password_hash);
        user.role = self.role.unwrap_or_default();
        user.phone = self.phone;
        user.subjects = self.subjects.unwrap_or_default();
        user.classes = self.classes.unwrap_or_default();
        user.language_preference = self.language_preference.unwrap_or_default();
        user
    }
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl LoginUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_non_empty("password", &self.password)
    }
}

/// Payload for `PUT /api/auth/profile`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub classes: Option<Vec<u8>>,
    #[serde(default)]
    pub language_preference: Option<Language>,
}

impl UpdateProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for class_level in self.classes.iter().flatten() {
            validate_class_level(*class_level)?;
        }
        Ok(())
    }

    /// Applies the provided fields to the user and bumps `updated_at`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(subjects) = self.subjects {
            user.subjects = subjects;
        }
        if let Some(classes) = self.classes {
            user.classes = classes;
        }
        if let Some(language) = self.language_preference {
            user.language_preference = language;
        }
        user.updated_at = Utc::now();
    }
}

/// Payload for `POST /api/questions`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePaper {
    pub board: String,
    #[serde(rename = "class")]
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub language: Option<Language>,
}

impl GeneratePaper {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_empty("board", &self.board)?;
        validate_class_level(self.class_level)?;
        validate_non_empty("subject", &self.subject)?;
        validate_non_empty("chapter", &self.chapter)
    }
}

/// Payload for `POST /api/notes`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateNotes {
    pub board: String,
    #[serde(rename = "class")]
    pub class_level: u8,
    pub subject: String,
    pub chapter: String,
    #[serde(default)]
    pub language: Option<Language>,
}

impl GenerateNotes {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_empty("board", &self.board)?;
        validate_class_level(self.class_level)?;
        validate_non_empty("subject", &self.subject)?;
        validate_non_empty("chapter", &self.chapter)
    }
}

/// Payload for `POST /api/performance`.
///
/// `marks_obtained > total_marks` is intentionally accepted; only
/// negative or non-finite marks are rejected.
#[derive(Debug, Deserialize)]
pub struct CreatePerformance {
    pub student_id: Uuid,
    pub subject: String,
    pub test_name: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    #[serde(default)]
    pub topic_wise_performance: Option<Vec<TopicMarks>>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl CreatePerformance {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_empty("subject", &self.subject)?;
        validate_non_empty("test_name", &self.test_name)?;
        validate_marks("marks_obtained", self.marks_obtained)?;
        validate_marks("total_marks", self.total_marks)?;
        for topic in self.topic_wise_performance.iter().flatten() {
            validate_non_empty("topic", &topic.topic)?;
            validate_marks("topic marks", topic.marks)?;
            validate_marks("topic total", topic.total)?;
        }
        Ok(())
    }
}

/// Payload for `PUT /api/answers/{id}`: a manual grading override.
#[derive(Debug, Deserialize)]
pub struct UpdateEvaluation {
    pub marks: f64,
    pub feedback: String,
    #[serde(default)]
    pub topic_mistakes: Vec<String>,
}

impl UpdateEvaluation {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_marks("marks", self.marks)
    }
}
