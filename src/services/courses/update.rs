use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, missing_prerequisites};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        entities::CourseUpdate,
        requests::{UpdateCourseRequest, validate_course_fields},
    },
};
use crate::utils::validate::{normalize_course_code, validate_course_code};

fn bad_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

pub async fn update_course(
    service: &CourseService,
    id: i64,
    body: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_course_by_id(id).await? else {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
    };

    let title = body.title.as_deref().unwrap_or(&existing.title);
    let credits = body.credits.unwrap_or(existing.credits);
    let capacity = body.capacity.unwrap_or(existing.capacity);
    if let Err(msg) = validate_course_fields(title, credits, capacity) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    // 代码变化时重新检查唯一性
    let code = match body.code {
        Some(code) => {
            if let Err(msg) = validate_course_code(code.trim()) {
                return Ok(bad_request(ErrorCode::BadRequest, msg));
            }
            let code = normalize_course_code(&code);
            if code != existing.code && storage.get_course_by_code(&code).await?.is_some() {
                return Ok(bad_request(
                    ErrorCode::CourseAlreadyExists,
                    format!("Course with code {code} already exists"),
                ));
            }
            Some(code)
        }
        None => None,
    };

    if let Some(ref ids) = body.prerequisite_ids {
        if ids.contains(&id) {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                "A course cannot be its own prerequisite",
            ));
        }
        let missing = missing_prerequisites(&storage, ids).await?;
        if !missing.is_empty() {
            return Ok(bad_request(
                ErrorCode::CourseNotFound,
                format!("Prerequisite course(s) not found: {missing:?}"),
            ));
        }
    }

    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let update = CourseUpdate {
        code,
        title: non_blank(body.title),
        description: body.description,
        department: non_blank(body.department),
        college: non_blank(body.college),
        credits: body.credits,
        capacity: body.capacity,
        prerequisite_ids: body.prerequisite_ids,
    };

    match storage.update_course(id, update).await? {
        Some(course) => Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully"))),
        None => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"))),
    }
}
