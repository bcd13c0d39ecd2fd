use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 课表条目，日期与时间以 YYYY-MM-DD / HH:MM 字符串保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub course_id: i64,
    pub lecturer_id: i64,
    pub academic_session_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub course_id: i64,
    pub lecturer_id: i64,
    pub academic_session_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub lecturer_id: Option<i64>,
    pub academic_session_id: Option<i64>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
}
