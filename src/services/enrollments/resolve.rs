//! 选课请求解析：学生、课程与学期的定位及写入结果映射

use std::sync::Arc;

use actix_web::{HttpResponse, http::StatusCode};

use crate::errors::CampusError;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{
        entities::{EnrollOptions, EnrollOutcome, Enrollment},
        requests::CreateEnrollmentRequest,
    },
};
use crate::storage::Storage;
use crate::utils::validate::normalize_course_code;

/// 单条选课失败
#[derive(Debug, Clone)]
pub struct EnrollError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl EnrollError {
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(ApiResponse::error_empty(self.code, self.message))
    }
}

impl From<CampusError> for EnrollError {
    fn from(err: CampusError) -> Self {
        tracing::error!("Enrollment storage error: {}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to process enrollment",
        )
    }
}

/// 按 ID 或学号定位学生
pub async fn resolve_student(
    storage: &Arc<dyn Storage>,
    req: &CreateEnrollmentRequest,
) -> Result<i64, EnrollError> {
    if let Some(id) = req.student_id {
        return match storage.get_student_by_id(id).await? {
            Some(student) => Ok(student.id),
            None => Err(EnrollError::not_found(
                ErrorCode::StudentNotFound,
                format!("Student {id} not found"),
            )),
        };
    }
    match req.matric_number.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(matric) => match storage.get_student_by_matric(matric).await? {
            Some(student) => Ok(student.id),
            None => Err(EnrollError::not_found(
                ErrorCode::StudentNotFound,
                format!("Student with matric number {matric} not found"),
            )),
        },
        None => Err(EnrollError::bad_request(
            ErrorCode::BadRequest,
            "student_id or matric_number is required",
        )),
    }
}

/// 按 ID 或代码定位课程
pub async fn resolve_course(
    storage: &Arc<dyn Storage>,
    req: &CreateEnrollmentRequest,
) -> Result<i64, EnrollError> {
    if let Some(id) = req.course_id {
        return match storage.get_course_by_id(id).await? {
            Some(course) => Ok(course.id),
            None => Err(EnrollError::not_found(
                ErrorCode::CourseNotFound,
                format!("Course {id} not found"),
            )),
        };
    }
    match req.course_code.as_deref().map(normalize_course_code).filter(|c| !c.is_empty()) {
        Some(code) => match storage.get_course_by_code(&code).await? {
            Some(course) => Ok(course.id),
            None => Err(EnrollError::not_found(
                ErrorCode::CourseNotFound,
                format!("Course {code} not found"),
            )),
        },
        None => Err(EnrollError::bad_request(
            ErrorCode::BadRequest,
            "course_id or course_code is required",
        )),
    }
}

/// 指定学期或当前学期
pub async fn resolve_session(
    storage: &Arc<dyn Storage>,
    session_id: Option<i64>,
) -> Result<i64, EnrollError> {
    match session_id {
        Some(id) => match storage.get_session_by_id(id).await? {
            Some(session) => Ok(session.id),
            None => Err(EnrollError::not_found(
                ErrorCode::SessionNotFound,
                format!("Academic session {id} not found"),
            )),
        },
        None => match storage.get_current_session().await? {
            Some(session) => Ok(session.id),
            None => Err(EnrollError::bad_request(
                ErrorCode::NoActiveSession,
                "No active academic session; specify session_id",
            )),
        },
    }
}

/// 将存储层的写入结果映射为成功或业务错误
pub fn outcome_to_result(outcome: EnrollOutcome) -> Result<Enrollment, EnrollError> {
    match outcome {
        EnrollOutcome::Created(enrollment) => Ok(enrollment),
        EnrollOutcome::AlreadyEnrolled => Err(EnrollError::bad_request(
            ErrorCode::EnrollmentAlreadyExists,
            "Student is already enrolled in this course for the session",
        )),
        EnrollOutcome::CourseFull { capacity } => Err(EnrollError::bad_request(
            ErrorCode::CourseFull,
            format!("Course is full (capacity {capacity})"),
        )),
        EnrollOutcome::PrerequisitesMissing(codes) => Err(EnrollError::bad_request(
            ErrorCode::PrerequisiteNotMet,
            format!("Missing completed prerequisite(s): {}", codes.join(", ")),
        )),
    }
}

/// 解析并写入一条选课
pub async fn enroll_one(
    storage: &Arc<dyn Storage>,
    req: &CreateEnrollmentRequest,
    options: EnrollOptions,
) -> Result<Enrollment, EnrollError> {
    let student_id = resolve_student(storage, req).await?;
    let course_id = resolve_course(storage, req).await?;
    let session_id = resolve_session(storage, req.session_id).await?;

    let outcome = storage
        .enroll_student(student_id, course_id, session_id, options)
        .await?;
    outcome_to_result(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_mapping() {
        let err = outcome_to_result(EnrollOutcome::AlreadyEnrolled).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::EnrollmentAlreadyExists);

        let err = outcome_to_result(EnrollOutcome::CourseFull { capacity: 40 }).unwrap_err();
        assert_eq!(err.code, ErrorCode::CourseFull);
        assert!(err.message.contains("40"));

        let err = outcome_to_result(EnrollOutcome::PrerequisitesMissing(vec![
            "CSC101".into(),
            "MTH101".into(),
        ]))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PrerequisiteNotMet);
        assert!(err.message.contains("CSC101, MTH101"));
    }
}
