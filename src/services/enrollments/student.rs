use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use super::resolve::{outcome_to_result, resolve_session};
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::entities::{EnrollOptions, EnrollmentStatus},
};
use crate::services::current_student;
use crate::services::system::DynamicConfig;

pub async fn self_enroll(
    service: &EnrollmentService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !DynamicConfig::allow_self_enroll().await {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Self enrollment is disabled",
        )));
    }

    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;

    if storage.get_course_by_id(course_id).await?.is_none() {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
    }
    let session_id = match resolve_session(&storage, None).await {
        Ok(id) => id,
        Err(err) => return Ok(err.into_response()),
    };

    let outcome = storage
        .enroll_student(student.id, course_id, session_id, EnrollOptions::default())
        .await?;
    match outcome_to_result(outcome) {
        Ok(enrollment) => {
            info!("Student {} self-enrolled in course {}", student.id, course_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Enrolled successfully")))
        }
        Err(err) => Ok(err.into_response()),
    }
}

/// 在读课程
pub async fn my_courses(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;

    let courses: Vec<_> = storage
        .list_student_enrollments(student.id)
        .await?
        .into_iter()
        .filter(|e| e.enrollment.status == EnrollmentStatus::Active)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::list(courses, "Enrolled courses retrieved")))
}

/// 全部选课记录，含已完成与退选
pub async fn my_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let enrollments = storage.list_student_enrollments(student.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(enrollments, "Enrollments retrieved")))
}
