use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{validate_date, validate_time_range};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ScheduleListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub lecturer_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub session_id: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleListQuery {
    pub page: u64,
    pub size: u64,
    pub course_ids: Option<Vec<i64>>,
    pub lecturer_id: Option<i64>,
    pub session_id: Option<i64>,
    pub date: Option<String>,
}

impl From<ScheduleListParams> for ScheduleListQuery {
    fn from(params: ScheduleListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            course_ids: params.course_id.map(|id| vec![id]),
            lecturer_id: params.lecturer_id,
            session_id: params.session_id,
            date: params.date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub course_id: i64,
    pub lecturer_id: i64,
    pub session_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub lecturer_id: Option<i64>,
    pub session_id: Option<i64>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
}

/// 校验日期、时间段与地点
pub fn validate_slot(date: &str, start: &str, end: &str, venue: &str) -> Result<(), &'static str> {
    validate_date(date)?;
    validate_time_range(start, end)?;
    if venue.trim().is_empty() {
        return Err("Venue is required");
    }
    Ok(())
}
