use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::Utc;
use tracing::info;

use super::{AssignmentService, assignment_not_found};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::{
            Assignment, NewSubmission, StudentAssignmentView, Submission, SubmissionRejection,
            SubmissionStatus, first_submission, resubmission,
        },
        requests::{AssignmentListParams, AssignmentListQuery, SubmitAssignmentRequest},
    },
    courses::entities::CourseSummary,
    users::entities::StudentProfile,
};
use crate::services::current_student;
use crate::storage::Storage;

fn rejection_response(rejection: SubmissionRejection) -> HttpResponse {
    let (status, code) = match rejection {
        SubmissionRejection::AlreadySubmitted => {
            (StatusCode::BAD_REQUEST, ErrorCode::SubmissionAlreadyExists)
        }
        SubmissionRejection::DeadlinePassed => {
            (StatusCode::BAD_REQUEST, ErrorCode::SubmissionDeadlinePassed)
        }
        SubmissionRejection::AlreadyGraded => {
            (StatusCode::BAD_REQUEST, ErrorCode::SubmissionAlreadyGraded)
        }
        SubmissionRejection::NotSubmitted => (StatusCode::NOT_FOUND, ErrorCode::SubmissionNotFound),
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, rejection.message()))
}

/// 学生可访问的作业：作业存在且学生在该课程有 active 选课
async fn student_assignment(
    storage: &Arc<dyn Storage>,
    student: &StudentProfile,
    id: i64,
) -> Result<std::result::Result<Assignment, HttpResponse>> {
    let Some(assignment) = storage.get_assignment_by_id(id).await? else {
        return Ok(Err(assignment_not_found()));
    };
    if !storage
        .is_actively_enrolled(student.id, assignment.course_id)
        .await?
    {
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled in this course",
        ))));
    }
    Ok(Ok(assignment))
}

/// 组装学生视角，无提交记录时状态为 pending
async fn build_views(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    assignments: Vec<Assignment>,
) -> Result<Vec<StudentAssignmentView>> {
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let mut submissions: HashMap<i64, Submission> = storage
        .list_student_submissions(student_id, &assignment_ids)
        .await?
        .into_iter()
        .map(|s| (s.assignment_id, s))
        .collect();

    let mut course_ids: Vec<i64> = assignments.iter().map(|a| a.course_id).collect();
    course_ids.sort_unstable();
    course_ids.dedup();
    let courses: HashMap<i64, CourseSummary> = storage
        .list_courses_by_ids(&course_ids)
        .await?
        .iter()
        .map(|c| (c.id, CourseSummary::from(c)))
        .collect();

    Ok(assignments
        .into_iter()
        .filter_map(|assignment| {
            let course = courses.get(&assignment.course_id)?.clone();
            let submission = submissions.remove(&assignment.id);
            Some(StudentAssignmentView {
                submission_status: submission
                    .as_ref()
                    .map(|s| s.status)
                    .unwrap_or(SubmissionStatus::Pending),
                assignment,
                course,
                submission,
            })
        })
        .collect())
}

pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let mut course_ids = storage.list_student_course_ids(student.id).await?;
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
    let views = build_views(&storage, student.id, result.items).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        views,
        result.pagination,
        "Assignments retrieved",
    )))
}

pub async fn get_assignment(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let assignment = match student_assignment(&storage, &student, id).await? {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    match build_views(&storage, student.id, vec![assignment]).await?.pop() {
        Some(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Assignment retrieved"))),
        None => Ok(assignment_not_found()),
    }
}

pub async fn submit(
    service: &AssignmentService,
    id: i64,
    body: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let assignment = match student_assignment(&storage, &student, id).await? {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    let existing = storage.get_submission(id, student.id).await?.map(|s| s.status);
    let status = match first_submission(
        existing,
        Utc::now(),
        assignment.due_date,
        assignment.allow_late_submission,
    ) {
        Ok(status) => status,
        Err(rejection) => return Ok(rejection_response(rejection)),
    };

    let submission = storage
        .create_submission(NewSubmission {
            assignment_id: id,
            student_id: student.id,
            content: body.content,
            files: body.files,
            status,
        })
        .await?;
    info!(
        "Student {} submitted assignment {} ({})",
        student.id, id, submission.status
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Assignment submitted")))
}

pub async fn resubmit(
    service: &AssignmentService,
    id: i64,
    body: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let assignment = match student_assignment(&storage, &student, id).await? {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    let existing = storage.get_submission(id, student.id).await?;
    let status = match resubmission(
        existing.as_ref().map(|s| s.status),
        Utc::now(),
        assignment.due_date,
        assignment.allow_late_submission,
    ) {
        Ok(status) => status,
        Err(rejection) => return Ok(rejection_response(rejection)),
    };
    let Some(existing) = existing else {
        return Ok(rejection_response(SubmissionRejection::NotSubmitted));
    };

    match storage
        .resubmit(existing.id, body.content, body.files, status)
        .await?
    {
        Some(submission) => {
            info!(
                "Student {} updated submission {} ({})",
                student.id, submission.id, submission.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission updated")))
        }
        None => Ok(rejection_response(SubmissionRejection::NotSubmitted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            rejection_response(SubmissionRejection::DeadlinePassed).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_response(SubmissionRejection::AlreadyGraded).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_response(SubmissionRejection::NotSubmitted).status(),
            StatusCode::NOT_FOUND
        );
    }
}
