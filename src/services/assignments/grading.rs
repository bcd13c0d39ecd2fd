use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, lecturer_assignment};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{entities::clamp_score, requests::GradeSubmissionRequest},
};
use crate::services::current_lecturer;

pub async fn list_submissions(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;
    if let Err(resp) = lecturer_assignment(&storage, &lecturer, id).await? {
        return Ok(resp);
    }

    let submissions = storage.list_submissions_for_assignment(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(submissions, "Submissions retrieved")))
}

pub async fn grade_submission(
    service: &AssignmentService,
    submission_id: i64,
    body: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !body.score.is_finite() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Score must be a number",
        )));
    }

    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;

    let Some(submission) = storage.get_submission_by_id(submission_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )));
    };
    let assignment = match lecturer_assignment(&storage, &lecturer, submission.assignment_id).await? {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    // 重复评分只覆盖分数与评语，状态保持 graded
    let score = clamp_score(body.score, assignment.total_marks);
    match storage
        .grade_submission(submission_id, score, body.feedback, lecturer.id)
        .await?
    {
        Some(graded) => {
            info!(
                "Submission {} graded {}/{} by lecturer {}",
                submission_id, score, assignment.total_marks, lecturer.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Submission graded")))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
    }
}
