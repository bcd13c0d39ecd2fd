use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;

use super::entities::{ExamSessionUpdate, NewExamSession};
use crate::models::schedules::requests::validate_slot;

#[derive(Debug, Deserialize)]
pub struct TimetableListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub session_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTimetableRequest {
    pub academic_session_id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTimetableRequest {
    pub academic_session_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExamSessionRequest {
    pub course_id: i64,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    #[serde(default)]
    pub invigilator_ids: Vec<i64>,
}

impl ExamSessionRequest {
    pub fn into_new_session(self) -> Result<NewExamSession, &'static str> {
        validate_slot(&self.exam_date, &self.start_time, &self.end_time, &self.venue)?;
        Ok(NewExamSession {
            course_id: self.course_id,
            exam_date: self.exam_date,
            start_time: self.start_time,
            end_time: self.end_time,
            venue: self.venue.trim().to_string(),
            invigilator_ids: dedup(self.invigilator_ids),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateExamSessionRequest {
    pub course_id: Option<i64>,
    pub exam_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub invigilator_ids: Option<Vec<i64>>,
}

impl UpdateExamSessionRequest {
    pub fn into_update(self) -> ExamSessionUpdate {
        ExamSessionUpdate {
            course_id: self.course_id,
            exam_date: self.exam_date,
            start_time: self.start_time,
            end_time: self.end_time,
            venue: self.venue.map(|v| v.trim().to_string()),
            invigilator_ids: self.invigilator_ids.map(dedup),
        }
    }
}

fn dedup(mut ids: Vec<i64>) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}

/// 时间表列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct TimetableListQuery {
    pub page: u64,
    pub size: u64,
    pub session_id: Option<i64>,
    pub published_only: bool,
}
