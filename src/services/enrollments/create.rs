use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use super::resolve::enroll_one;
use crate::models::{
    ApiResponse,
    enrollments::{entities::EnrollOptions, requests::CreateEnrollmentRequest},
};

pub async fn create_enrollment(
    service: &EnrollmentService,
    body: CreateEnrollmentRequest,
    force: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match enroll_one(&storage, &body, EnrollOptions { force }).await {
        Ok(enrollment) => {
            info!(
                "Enrolled student {} in course {} (session {}, force={})",
                enrollment.student_id, enrollment.course_id, enrollment.academic_session_id, force
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Student enrolled successfully")))
        }
        Err(err) => Ok(err.into_response()),
    }
}
