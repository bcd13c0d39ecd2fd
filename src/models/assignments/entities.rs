use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::courses::entities::CourseSummary;

// 作业
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub lecturer_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub total_marks: f64,
    pub allow_late_submission: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 提交状态，pending 仅在没有提交记录时由读取接口推导
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Late,
    Graded,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Late => "late",
            Self::Graded => "graded",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            "late" => Ok(Self::Late),
            "graded" => Ok(Self::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    /// 客户端提供的文件引用（URL 或路径）
    pub files: Vec<String>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

/// 提交列表中的条目（附学生信息）
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    pub submission: Submission,
    pub matric_number: String,
    pub student_name: String,
}

/// 学生视角的作业
#[derive(Debug, Clone, Serialize)]
pub struct StudentAssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub course: CourseSummary,
    pub submission_status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

/// 拒绝提交的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRejection {
    AlreadySubmitted,
    DeadlinePassed,
    AlreadyGraded,
    NotSubmitted,
}

impl SubmissionRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AlreadySubmitted => "Assignment has already been submitted, update it instead",
            Self::DeadlinePassed => "The due date has passed and late submissions are not allowed",
            Self::AlreadyGraded => "Submission has already been graded",
            Self::NotSubmitted => "No submission found for this assignment",
        }
    }
}

/// 按截止时间决定提交状态：按时为 submitted，逾期且允许迟交为 late
pub fn submission_status_at(
    now: DateTime<Utc>,
    due_date: DateTime<Utc>,
    allow_late: bool,
) -> Result<SubmissionStatus, SubmissionRejection> {
    if now <= due_date {
        Ok(SubmissionStatus::Submitted)
    } else if allow_late {
        Ok(SubmissionStatus::Late)
    } else {
        Err(SubmissionRejection::DeadlinePassed)
    }
}

/// 首次提交：已有提交记录时拒绝
pub fn first_submission(
    existing: Option<SubmissionStatus>,
    now: DateTime<Utc>,
    due_date: DateTime<Utc>,
    allow_late: bool,
) -> Result<SubmissionStatus, SubmissionRejection> {
    if existing.is_some() {
        return Err(SubmissionRejection::AlreadySubmitted);
    }
    submission_status_at(now, due_date, allow_late)
}

/// 更新提交：只能修改未评分的提交
pub fn resubmission(
    existing: Option<SubmissionStatus>,
    now: DateTime<Utc>,
    due_date: DateTime<Utc>,
    allow_late: bool,
) -> Result<SubmissionStatus, SubmissionRejection> {
    match existing {
        None | Some(SubmissionStatus::Pending) => Err(SubmissionRejection::NotSubmitted),
        Some(SubmissionStatus::Graded) => Err(SubmissionRejection::AlreadyGraded),
        Some(SubmissionStatus::Submitted) | Some(SubmissionStatus::Late) => {
            submission_status_at(now, due_date, allow_late)
        }
    }
}

/// 分数截断到 [0, total_marks]
pub fn clamp_score(score: f64, total_marks: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, total_marks.max(0.0))
}

/// 新提交（存储层输入）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub files: Vec<String>,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: i64,
    pub lecturer_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: i64,
    pub total_marks: f64,
    pub allow_late_submission: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub total_marks: Option<f64>,
    pub allow_late_submission: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_first_submission_deadline() {
        let due = Utc::now();
        let before = due - Duration::hours(1);
        let after = due + Duration::hours(1);

        assert_eq!(
            first_submission(None, before, due, false),
            Ok(SubmissionStatus::Submitted)
        );
        assert_eq!(
            first_submission(None, after, due, false),
            Err(SubmissionRejection::DeadlinePassed)
        );
        assert_eq!(
            first_submission(None, after, due, true),
            Ok(SubmissionStatus::Late)
        );
        assert_eq!(
            first_submission(Some(SubmissionStatus::Submitted), before, due, true),
            Err(SubmissionRejection::AlreadySubmitted)
        );
    }

    #[test]
    fn test_resubmission_rules() {
        let due = Utc::now();
        let after = due + Duration::minutes(5);
        assert_eq!(
            resubmission(Some(SubmissionStatus::Submitted), after, due, true),
            Ok(SubmissionStatus::Late)
        );
        assert_eq!(
            resubmission(Some(SubmissionStatus::Late), after, due, false),
            Err(SubmissionRejection::DeadlinePassed)
        );
        assert_eq!(
            resubmission(Some(SubmissionStatus::Graded), due, due, true),
            Err(SubmissionRejection::AlreadyGraded)
        );
        assert_eq!(
            resubmission(None, due, due, true),
            Err(SubmissionRejection::NotSubmitted)
        );
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(120.0, 100.0), 100.0);
        assert_eq!(clamp_score(-3.0, 100.0), 0.0);
        assert_eq!(clamp_score(42.5, 100.0), 42.5);
        assert_eq!(clamp_score(f64::NAN, 100.0), 0.0);
    }
}
