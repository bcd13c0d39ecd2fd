use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TimetableService, timetable_not_found};
use crate::models::{
    ApiResponse, ErrorCode,
    timetables::{
        entities::{ExamSessionScope, ExamTimetableDetail, ExamTimetableUpdate, NewExamTimetable},
        requests::{
            CreateTimetableRequest, TimetableListParams, TimetableListQuery,
            UpdateTimetableRequest,
        },
    },
};
use crate::services::current_user;

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SessionNotFound,
        "Academic session not found",
    ))
}

pub async fn list_timetables(
    service: &TimetableService,
    query: TimetableListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();
    let result = storage
        .list_timetables_with_pagination(TimetableListQuery {
            page,
            size,
            session_id: query.session_id,
            published_only: false,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        result.items,
        result.pagination,
        "Exam timetables retrieved",
    )))
}

pub async fn create_timetable(
    service: &TimetableService,
    body: CreateTimetableRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Ok(bad_request("Title is required"));
    }

    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    if storage
        .get_session_by_id(body.academic_session_id)
        .await?
        .is_none()
    {
        return Ok(session_not_found());
    }

    let timetable = storage
        .create_timetable(NewExamTimetable {
            academic_session_id: body.academic_session_id,
            title,
            description: body.description,
            created_by: user.id,
        })
        .await?;
    info!("Exam timetable {} created", timetable.id);

    Ok(HttpResponse::Created()
        .json(ApiResponse::success(timetable, "Exam timetable created successfully")))
}

pub async fn get_timetable(
    service: &TimetableService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(timetable) = storage.get_timetable_by_id(id).await? else {
        return Ok(timetable_not_found());
    };
    let sessions = storage.list_exam_sessions(id, &ExamSessionScope::All).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExamTimetableDetail {
            timetable,
            sessions,
        },
        "Exam timetable retrieved",
    )))
}

pub async fn update_timetable(
    service: &TimetableService,
    id: i64,
    body: UpdateTimetableRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = body.title.map(|t| t.trim().to_string());
    if title.as_deref().is_some_and(str::is_empty) {
        return Ok(bad_request("Title must not be empty"));
    }

    let storage = service.get_storage(request)?;
    if let Some(session_id) = body.academic_session_id
        && storage.get_session_by_id(session_id).await?.is_none()
    {
        return Ok(session_not_found());
    }

    let update = ExamTimetableUpdate {
        academic_session_id: body.academic_session_id,
        title,
        description: body.description,
    };
    match storage.update_timetable(id, update).await? {
        Some(timetable) => {
            info!("Exam timetable {} updated", id);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(timetable, "Exam timetable updated successfully")))
        }
        None => Ok(timetable_not_found()),
    }
}

pub async fn delete_timetable(
    service: &TimetableService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.delete_timetable(id).await? {
        info!("Exam timetable {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam timetable deleted successfully")))
    } else {
        Ok(timetable_not_found())
    }
}

pub async fn set_published(
    service: &TimetableService,
    id: i64,
    published: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.set_timetable_published(id, published).await? {
        Some(timetable) => {
            let message = if published {
                "Exam timetable published"
            } else {
                "Exam timetable unpublished"
            };
            info!("Exam timetable {} published={}", id, published);
            Ok(HttpResponse::Ok().json(ApiResponse::success(timetable, message)))
        }
        None => Ok(timetable_not_found()),
    }
}
