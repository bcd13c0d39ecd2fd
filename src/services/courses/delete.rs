use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_course(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
    }

    let active = storage.count_active_enrollments_for_course(id).await?;
    if active > 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseDeleteBlocked,
            format!("Course has {active} active enrollment(s) and cannot be deleted"),
        )));
    }

    if storage.delete_course(id).await? {
        info!("Course {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
    } else {
        Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")))
    }
}
