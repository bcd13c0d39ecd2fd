use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

/// 课代表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRep {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub matric_number: String,
    pub full_name: String,
    pub appointed_by: i64,
    pub appointed_at: DateTime<Utc>,
}

/// 课程聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub course_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub sender_role: UserRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// 课代表任命结果
#[derive(Debug, Clone)]
pub enum AppointOutcome {
    Appointed(CourseRep),
    AlreadyAppointed,
    NotEnrolled,
}
