use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{
        entities::EnrollmentStatusUpdate,
        requests::{EnrollmentListParams, EnrollmentListQuery, UpdateEnrollmentStatusRequest},
    },
};
use crate::services::system::DynamicConfig;

fn enrollment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::EnrollmentNotFound,
        "Enrollment not found",
    ))
}

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = storage
        .list_enrollments_with_pagination(EnrollmentListQuery::from(query))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "Enrollments retrieved",
    )))
}

pub async fn get_enrollment(
    service: &EnrollmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_enrollment_by_id(id).await? {
        Some(enrollment) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "Enrollment retrieved")))
        }
        None => Ok(enrollment_not_found()),
    }
}

pub async fn update_status(
    service: &EnrollmentService,
    id: i64,
    body: UpdateEnrollmentStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.status.is_none() && body.grade.is_none() && body.remarks.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Nothing to update",
        )));
    }

    let storage = service.get_storage(request)?;
    let Some(existing) = storage.get_enrollment_by_id(id).await? else {
        return Ok(enrollment_not_found());
    };

    if let Some(next) = body.status
        && DynamicConfig::strict_status_transitions().await
        && !existing.status.can_transition_to(next)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change status from {} to {}", existing.status, next),
        )));
    }

    let update = EnrollmentStatusUpdate {
        status: body.status,
        grade: body.grade.map(|g| g.trim().to_string()),
        remarks: body.remarks,
    };
    match storage.update_enrollment(id, update).await? {
        Some(enrollment) => {
            info!(
                "Enrollment {} updated: {} -> {}",
                id, existing.status, enrollment.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "Enrollment updated")))
        }
        None => Ok(enrollment_not_found()),
    }
}

pub async fn delete_enrollment(
    service: &EnrollmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.delete_enrollment(id).await? {
        info!("Enrollment {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment deleted")))
    } else {
        Ok(enrollment_not_found())
    }
}
