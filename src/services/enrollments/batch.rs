use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use super::resolve::enroll_one;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, BatchResult, ErrorCode,
    enrollments::{
        entities::{EnrollOptions, Enrollment},
        requests::{BatchEnrollmentRequest, CreateEnrollmentRequest},
    },
};

pub async fn batch_enroll(
    service: &EnrollmentService,
    body: BatchEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let limit = AppConfig::get().enrollment.batch_limit;
    if body.enrollments.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "enrollments must not be empty",
        )));
    }
    if body.enrollments.len() > limit {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("At most {limit} enrollments can be submitted at once"),
        )));
    }

    let storage = service.get_storage(request)?;
    let options = EnrollOptions { force: body.force };

    // 逐条处理，单条失败不影响其他条目
    let mut result: BatchResult<Enrollment, CreateEnrollmentRequest> = BatchResult::default();
    for item in body.enrollments {
        match enroll_one(&storage, &item, options).await {
            Ok(enrollment) => result.push_ok(enrollment),
            Err(err) => result.push_err(item, err.message),
        }
    }

    let summary = result.summary();
    info!("Batch enrollment finished: {}", summary);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        format!("Batch enrollment completed: {summary}"),
    )))
}
