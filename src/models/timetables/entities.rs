use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 考试时间表，生命周期 draft -> published -> draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamTimetable {
    pub id: i64,
    pub academic_session_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 考试场次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: i64,
    pub timetable_id: i64,
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub invigilator_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamTimetableDetail {
    #[serde(flatten)]
    pub timetable: ExamTimetable,
    pub sessions: Vec<ExamSession>,
}

/// 场次可见范围，由调用者角色决定
#[derive(Debug, Clone, PartialEq)]
pub enum ExamSessionScope {
    All,
    /// 学生：已选课程
    Courses(Vec<i64>),
    /// 讲师：任教课程或监考场次
    Lecturer { lecturer_id: i64, course_ids: Vec<i64> },
}

/// 场次写入操作的结果，时间表已发布时拒绝修改
#[derive(Debug, Clone)]
pub enum ExamSessionMutation<T> {
    Done(T),
    TimetableNotFound,
    SessionNotFound,
    Published,
}

#[derive(Debug, Clone)]
pub struct NewExamTimetable {
    pub academic_session_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ExamTimetableUpdate {
    pub academic_session_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExamSession {
    pub course_id: i64,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub invigilator_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExamSessionUpdate {
    pub course_id: Option<i64>,
    pub exam_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub invigilator_ids: Option<Vec<i64>>,
}
