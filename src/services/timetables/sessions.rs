use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TimetableService, timetable_not_found};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::requests::validate_slot,
    timetables::{
        entities::{ExamSessionMutation, ExamSessionScope},
        requests::{ExamSessionRequest, UpdateExamSessionRequest},
    },
};
use crate::storage::Storage;

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

/// 将场次写入结果映射为响应
fn mutation_response<T>(
    mutation: ExamSessionMutation<T>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match mutation {
        ExamSessionMutation::Done(value) => ok(value),
        ExamSessionMutation::TimetableNotFound => timetable_not_found(),
        ExamSessionMutation::SessionNotFound => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::ExamSessionNotFound, "Exam session not found"),
        ),
        ExamSessionMutation::Published => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::TimetablePublished,
            "Exam timetable is published; unpublish it before editing sessions",
        )),
    }
}

/// 课程与监考讲师必须存在
async fn check_references(
    storage: &Arc<dyn Storage>,
    course_id: Option<i64>,
    invigilator_ids: Option<&[i64]>,
) -> Result<Option<HttpResponse>> {
    if let Some(course_id) = course_id
        && storage.get_course_by_id(course_id).await?.is_none()
    {
        return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            format!("Course {course_id} not found"),
        ))));
    }
    for lecturer_id in invigilator_ids.unwrap_or_default() {
        if storage.get_lecturer_by_id(*lecturer_id).await?.is_none() {
            return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LecturerNotFound,
                format!("Invigilator {lecturer_id} not found"),
            ))));
        }
    }
    Ok(None)
}

pub async fn add_session(
    service: &TimetableService,
    id: i64,
    body: ExamSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match body.into_new_session() {
        Ok(session) => session,
        Err(msg) => return Ok(bad_request(msg)),
    };

    let storage = service.get_storage(request)?;
    if let Some(resp) =
        check_references(&storage, Some(session.course_id), Some(&session.invigilator_ids)).await?
    {
        return Ok(resp);
    }

    let mutation = storage.add_exam_session(id, session).await?;
    Ok(mutation_response(mutation, |session| {
        info!("Exam session {} added to timetable {}", session.id, id);
        HttpResponse::Created().json(ApiResponse::success(session, "Exam session added"))
    }))
}

pub async fn update_session(
    service: &TimetableService,
    id: i64,
    session_id: i64,
    body: UpdateExamSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let update = body.into_update();

    // 以合并后的值校验时间段
    let existing = storage
        .list_exam_sessions(id, &ExamSessionScope::All)
        .await?
        .into_iter()
        .find(|s| s.id == session_id);
    if let Some(existing) = existing {
        let date = update.exam_date.as_deref().unwrap_or(&existing.exam_date);
        let start = update.start_time.as_deref().unwrap_or(&existing.start_time);
        let end = update.end_time.as_deref().unwrap_or(&existing.end_time);
        let venue = update.venue.as_deref().unwrap_or(&existing.venue);
        if let Err(msg) = validate_slot(date, start, end, venue) {
            return Ok(bad_request(msg));
        }
    }

    if let Some(resp) =
        check_references(&storage, update.course_id, update.invigilator_ids.as_deref()).await?
    {
        return Ok(resp);
    }

    let mutation = storage.update_exam_session(id, session_id, update).await?;
    Ok(mutation_response(mutation, |session| {
        info!("Exam session {} in timetable {} updated", session_id, id);
        HttpResponse::Ok().json(ApiResponse::success(session, "Exam session updated"))
    }))
}

pub async fn remove_session(
    service: &TimetableService,
    id: i64,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let mutation = storage.remove_exam_session(id, session_id).await?;
    Ok(mutation_response(mutation, |()| {
        info!("Exam session {} removed from timetable {}", session_id, id);
        HttpResponse::Ok().json(ApiResponse::success_empty("Exam session removed"))
    }))
}
