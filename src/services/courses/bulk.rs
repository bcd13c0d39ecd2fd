use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, BatchResult, ErrorCode,
    courses::{
        entities::{Course, duplicate_codes},
        requests::{BulkCourseItem, BulkCreateCoursesRequest, CreateCourseRequest},
    },
};
use crate::utils::validate::normalize_course_code;

/// 批量建课
///
/// 先拒绝请求内重复的代码，再拒绝与已有课程冲突的代码，之后逐条写入；
/// 已创建的课程不会因后续失败回滚。
pub async fn bulk_create_courses(
    service: &CourseService,
    body: BulkCreateCoursesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.courses.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "At least one course is required",
        )));
    }
    if body.department.trim().is_empty() || body.college.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Department and college are required",
        )));
    }

    let codes: Vec<String> = body
        .courses
        .iter()
        .map(|c| normalize_course_code(&c.code))
        .collect();

    let duplicates = duplicate_codes(codes.iter().map(String::as_str));
    if !duplicates.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            format!("Duplicate course codes in request: {}", duplicates.join(", ")),
        )));
    }

    let storage = service.get_storage(request)?;

    let existing = storage.find_existing_course_codes(&codes).await?;
    if !existing.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            format!("Course codes already exist: {}", existing.join(", ")),
        )));
    }

    let mut result: BatchResult<Course, BulkCourseItem> = BatchResult::default();
    for item in body.courses {
        let create = CreateCourseRequest {
            code: item.code.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            department: body.department.clone(),
            college: body.college.clone(),
            credits: item.credits,
            capacity: item.capacity,
            prerequisite_ids: Vec::new(),
        };
        let new_course = match create.into_new_course() {
            Ok(course) => course,
            Err(msg) => {
                result.push_err(item, msg);
                continue;
            }
        };
        match storage.create_course(new_course).await {
            Ok(course) => result.push_ok(course),
            Err(e) => result.push_err(item, e.message()),
        }
    }

    info!(
        "Bulk course creation for {}: {}",
        body.department.trim(),
        result.summary()
    );
    let message = result.summary();
    Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
}
