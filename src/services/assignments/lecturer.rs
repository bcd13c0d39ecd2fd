use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, assignment_not_found, lecturer_assignment};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::{AssignmentUpdate, NewAssignment},
        requests::{
            AssignmentListParams, AssignmentListQuery, CreateAssignmentRequest,
            UpdateAssignmentRequest, validate_total_marks,
        },
    },
};
use crate::services::current_lecturer;

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

/// 讲师所授课程的作业
pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    let mut course_ids = storage.list_lecturer_course_ids(lecturer.id).await?;
    if let Some(course_id) = query.course_id {
        course_ids.retain(|id| *id == course_id);
    }

    let (page, size) = query.pagination.normalized();
    let result = storage
        .list_assignments_with_pagination(AssignmentListQuery {
            page,
            size,
            course_ids: Some(course_ids),
            lecturer_id: None,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        result.items,
        result.pagination,
        "Assignments retrieved",
    )))
}

pub async fn create_assignment(
    service: &AssignmentService,
    body: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Ok(bad_request("Title is required"));
    }
    if let Err(msg) = validate_total_marks(body.total_marks) {
        return Ok(bad_request(msg));
    }

    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;

    if storage.get_course_by_id(body.course_id).await?.is_none() {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
    }
    if !storage
        .is_lecturer_assigned(body.course_id, lecturer.id)
        .await?
    {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotAssigned,
            "You are not assigned to this course",
        )));
    }

    let assignment = storage
        .create_assignment(NewAssignment {
            course_id: body.course_id,
            lecturer_id: lecturer.id,
            title,
            description: body.description,
            due_date: body.due_date.timestamp(),
            total_marks: body.total_marks,
            allow_late_submission: body.allow_late_submission,
        })
        .await?;
    info!(
        "Assignment {} created for course {} by lecturer {}",
        assignment.id, assignment.course_id, lecturer.id
    );

    Ok(HttpResponse::Created()
        .json(ApiResponse::success(assignment, "Assignment created successfully")))
}

pub async fn get_assignment(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    match lecturer_assignment(&storage, &lecturer, id).await? {
        Ok(assignment) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Assignment retrieved")))
        }
        Err(resp) => Ok(resp),
    }
}

pub async fn update_assignment(
    service: &AssignmentService,
    id: i64,
    body: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = body.title.map(|t| t.trim().to_string());
    if title.as_deref().is_some_and(str::is_empty) {
        return Ok(bad_request("Title must not be empty"));
    }
    if let Some(total_marks) = body.total_marks
        && let Err(msg) = validate_total_marks(total_marks)
    {
        return Ok(bad_request(msg));
    }

    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    if let Err(resp) = lecturer_assignment(&storage, &lecturer, id).await? {
        return Ok(resp);
    }

    let update = AssignmentUpdate {
        title,
        description: body.description,
        due_date: body.due_date.map(|d| d.timestamp()),
        total_marks: body.total_marks,
        allow_late_submission: body.allow_late_submission,
    };
    match storage.update_assignment(id, update).await? {
        Some(assignment) => {
            info!("Assignment {} updated", id);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(assignment, "Assignment updated successfully")))
        }
        None => Ok(assignment_not_found()),
    }
}

pub async fn delete_assignment(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    if let Err(resp) = lecturer_assignment(&storage, &lecturer, id).await? {
        return Ok(resp);
    }

    if storage.delete_assignment(id).await? {
        info!("Assignment {} deleted by lecturer {}", id, lecturer.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted successfully")))
    } else {
        Ok(assignment_not_found())
    }
}
