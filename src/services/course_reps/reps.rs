use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseRepService;
use crate::models::{
    ApiResponse, ErrorCode,
    course_reps::{entities::AppointOutcome, requests::AppointCourseRepRequest},
};
use crate::services::current_user;

fn course_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"))
}

pub async fn list_reps(
    service: &CourseRepService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_course_by_id(course_id).await?.is_none() {
        return Ok(course_not_found());
    }
    let reps = storage.list_course_reps(course_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(reps, "Course reps retrieved")))
}

pub async fn appoint_rep(
    service: &CourseRepService,
    course_id: i64,
    body: AppointCourseRepRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let admin = current_user(request)?;

    if storage.get_course_by_id(course_id).await?.is_none() {
        return Ok(course_not_found());
    }
    if storage.get_student_by_id(body.student_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            format!("Student {} not found", body.student_id),
        )));
    }

    match storage
        .appoint_course_rep(course_id, body.student_id, admin.id)
        .await?
    {
        AppointOutcome::Appointed(rep) => {
            info!("Student {} appointed rep of course {}", rep.student_id, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(rep, "Course rep appointed")))
        }
        AppointOutcome::AlreadyAppointed => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(
                ErrorCode::CourseRepAlreadyExists,
                "Student is already a rep of this course",
            ),
        )),
        AppointOutcome::NotEnrolled => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Student is not enrolled in this course",
        ))),
    }
}

pub async fn remove_rep(
    service: &CourseRepService,
    course_id: i64,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.remove_course_rep(course_id, student_id).await? {
        info!("Student {} removed as rep of course {}", student_id, course_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course rep removed")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseRepNotFound,
            "Course rep not found",
        )))
    }
}
