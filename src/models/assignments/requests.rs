use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AssignmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub total_marks: f64,
    #[serde(default)]
    pub allow_late_submission: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub total_marks: Option<f64>,
    pub allow_late_submission: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl SubmitAssignmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let has_content = self
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_content && self.files.is_empty() {
            return Err("Submission must contain content or at least one file reference");
        }
        if self.files.iter().any(|f| f.trim().is_empty()) {
            return Err("File references must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

pub fn validate_total_marks(total_marks: f64) -> Result<(), &'static str> {
    if !total_marks.is_finite() || total_marks <= 0.0 {
        return Err("Total marks must be a positive number");
    }
    Ok(())
}

/// 作业列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: u64,
    pub size: u64,
    pub course_ids: Option<Vec<i64>>,
    pub lecturer_id: Option<i64>,
}
