use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, missing_prerequisites};
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};

pub async fn create_course(
    service: &CourseService,
    body: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let new_course = match body.into_new_course() {
        Ok(course) => course,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request)?;

    if storage.get_course_by_code(&new_course.code).await?.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            format!("Course with code {} already exists", new_course.code),
        )));
    }

    let missing = missing_prerequisites(&storage, &new_course.prerequisite_ids).await?;
    if !missing.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            format!("Prerequisite course(s) not found: {missing:?}"),
        )));
    }

    let course = storage.create_course(new_course).await?;
    info!("Course {} ({}) created", course.id, course.code);

    Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created successfully")))
}
