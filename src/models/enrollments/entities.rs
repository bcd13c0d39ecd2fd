use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::courses::entities::CourseSummary;

// 选课状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
    Failed,
}

impl EnrollmentStatus {
    /// 允许的状态迁移（不含自环）
    pub const TRANSITIONS: &'static [(EnrollmentStatus, EnrollmentStatus)] = &[
        (Self::Active, Self::Completed),
        (Self::Active, Self::Dropped),
        (Self::Active, Self::Failed),
        (Self::Dropped, Self::Active),
        (Self::Failed, Self::Active),
    ];

    /// 状态迁移是否合法，保持原状态总是合法的
    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        self == next || Self::TRANSITIONS.contains(&(self, next))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
            Self::Failed => "failed",
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EnrollmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的选课状态: '{s}'. 支持的状态: active, completed, dropped, failed"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "dropped" => Ok(Self::Dropped),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub academic_session_id: i64,
    pub status: EnrollmentStatus,
    pub grade: Option<String>,
    pub remarks: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 学生视角的选课记录
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentWithCourse {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: CourseSummary,
    pub session_name: String,
}

/// 选课写入选项
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollOptions {
    /// 跳过容量与先修课程检查
    pub force: bool,
}

/// 选课写入结果，除 Created 外均未修改任何数据
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    Created(Enrollment),
    AlreadyEnrolled,
    CourseFull { capacity: i32 },
    PrerequisitesMissing(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentStatusUpdate {
    pub status: Option<EnrollmentStatus>,
    pub grade: Option<String>,
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::EnrollmentStatus::*;

    #[test]
    fn test_status_edges() {
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Dropped));
        assert!(Active.can_transition_to(Failed));
        assert!(Dropped.can_transition_to(Active));
        assert!(Failed.can_transition_to(Active));
        assert!(Completed.can_transition_to(Completed));

        assert!(!Completed.can_transition_to(Active));
        assert!(!Dropped.can_transition_to(Completed));
        assert!(!Failed.can_transition_to(Dropped));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [Active, Completed, Dropped, Failed] {
            assert_eq!(status.as_str().parse::<super::EnrollmentStatus>().unwrap(), status);
        }
        assert!("withdrawn".parse::<super::EnrollmentStatus>().is_err());
    }
}
