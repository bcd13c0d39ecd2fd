use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_lecturer;

pub async fn lecturer_courses(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    let courses = storage.list_courses_for_lecturer(lecturer.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(courses, "Assigned courses retrieved")))
}

pub async fn course_students(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;

    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
    }
    if !storage.is_lecturer_assigned(id, lecturer.id).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotAssigned,
            "You are not assigned to this course",
        )));
    }

    let students = storage.list_course_students(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(students, "Course students retrieved")))
}
