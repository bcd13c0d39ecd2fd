use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::{Deserialize, Serialize};

use super::entities::EnrollmentStatus;

#[derive(Debug, Deserialize)]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub session_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub session_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

impl From<EnrollmentListParams> for EnrollmentListQuery {
    fn from(params: EnrollmentListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            course_id: params.course_id,
            session_id: params.session_id,
            status: params.status,
        }
    }
}

/// 单条选课请求：学生按 ID 或学号，课程按 ID 或代码，学期缺省为当前学期
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matric_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchEnrollmentRequest {
    pub enrollments: Vec<CreateEnrollmentRequest>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEnrollmentStatusRequest {
    pub status: Option<EnrollmentStatus>,
    pub grade: Option<String>,
    pub remarks: Option<String>,
}
