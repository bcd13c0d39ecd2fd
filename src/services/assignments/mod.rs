pub mod grading;
pub mod lecturer;
pub mod student;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{
            AssignmentListParams, CreateAssignmentRequest, GradeSubmissionRequest,
            SubmitAssignmentRequest, UpdateAssignmentRequest,
        },
    },
    users::entities::LecturerProfile,
};
use crate::storage::Storage;

super::declare_service!(AssignmentService);

impl AssignmentService {
    pub async fn lecturer_list(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturer::list_assignments(self, query, request).await
    }

    pub async fn create_assignment(
        &self,
        body: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturer::create_assignment(self, body, request).await
    }

    pub async fn lecturer_get(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        lecturer::get_assignment(self, id, request).await
    }

    pub async fn update_assignment(
        &self,
        id: i64,
        body: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturer::update_assignment(self, id, body, request).await
    }

    pub async fn delete_assignment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturer::delete_assignment(self, id, request).await
    }

    pub async fn list_submissions(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::list_submissions(self, id, request).await
    }

    // 评分，分数截断到总分
    pub async fn grade_submission(
        &self,
        submission_id: i64,
        body: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::grade_submission(self, submission_id, body, request).await
    }

    pub async fn student_list(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::list_assignments(self, query, request).await
    }

    pub async fn student_get(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::get_assignment(self, id, request).await
    }

    pub async fn submit(
        &self,
        id: i64,
        body: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::submit(self, id, body, request).await
    }

    pub async fn resubmit(
        &self,
        id: i64,
        body: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::resubmit(self, id, body, request).await
    }
}

pub(crate) fn assignment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssignmentNotFound,
        "Assignment not found",
    ))
}

/// 讲师可访问的作业：作业存在且讲师已分配到该课程
pub(crate) async fn lecturer_assignment(
    storage: &Arc<dyn Storage>,
    lecturer: &LecturerProfile,
    id: i64,
) -> Result<std::result::Result<Assignment, HttpResponse>> {
    let Some(assignment) = storage.get_assignment_by_id(id).await? else {
        return Ok(Err(assignment_not_found()));
    };
    if !storage
        .is_lecturer_assigned(assignment.course_id, lecturer.id)
        .await?
    {
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotAssigned,
            "You are not assigned to this course",
        ))));
    }
    Ok(Ok(assignment))
}
