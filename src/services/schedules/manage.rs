use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{
        entities::{NewSchedule, ScheduleUpdate},
        requests::{
            CreateScheduleRequest, ScheduleListParams, ScheduleListQuery, UpdateScheduleRequest,
            validate_slot,
        },
    },
};
use crate::storage::Storage;

fn schedule_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ScheduleNotFound,
        "Schedule not found",
    ))
}

/// 校验讲师存在且已分配到课程，学期（如有）存在
async fn check_references(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    lecturer_id: i64,
    session_id: Option<i64>,
) -> Result<Option<HttpResponse>> {
    if storage.get_course_by_id(course_id).await?.is_none() {
        return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))));
    }
    if storage.get_lecturer_by_id(lecturer_id).await?.is_none() {
        return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotFound,
            format!("Lecturer {lecturer_id} not found"),
        ))));
    }
    if !storage.is_lecturer_assigned(course_id, lecturer_id).await? {
        return Ok(Some(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotAssigned,
            format!("Lecturer {lecturer_id} is not assigned to this course"),
        ))));
    }
    if let Some(session_id) = session_id
        && storage.get_session_by_id(session_id).await?.is_none()
    {
        return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SessionNotFound,
            "Academic session not found",
        ))));
    }
    Ok(None)
}

pub async fn list_schedules(
    service: &ScheduleService,
    query: ScheduleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = storage
        .list_schedules_with_pagination(ScheduleListQuery::from(query))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "Schedules retrieved",
    )))
}

pub async fn create_schedule(
    service: &ScheduleService,
    body: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_slot(&body.date, &body.start_time, &body.end_time, &body.venue) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;
    if let Some(resp) =
        check_references(&storage, body.course_id, body.lecturer_id, body.session_id).await?
    {
        return Ok(resp);
    }

    let schedule = storage
        .create_schedule(NewSchedule {
            course_id: body.course_id,
            lecturer_id: body.lecturer_id,
            academic_session_id: body.session_id,
            date: body.date.trim().to_string(),
            start_time: body.start_time.trim().to_string(),
            end_time: body.end_time.trim().to_string(),
            venue: body.venue.trim().to_string(),
        })
        .await?;
    info!(
        "Schedule {} created for course {} on {}",
        schedule.id, schedule.course_id, schedule.date
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(schedule, "Schedule created successfully")))
}

pub async fn get_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_schedule_by_id(id).await? {
        Some(schedule) => Ok(HttpResponse::Ok().json(ApiResponse::success(schedule, "Schedule retrieved"))),
        None => Ok(schedule_not_found()),
    }
}

pub async fn update_schedule(
    service: &ScheduleService,
    id: i64,
    body: UpdateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(existing) = storage.get_schedule_by_id(id).await? else {
        return Ok(schedule_not_found());
    };

    // 以合并后的值整体校验
    let date = body.date.as_deref().unwrap_or(&existing.date);
    let start = body.start_time.as_deref().unwrap_or(&existing.start_time);
    let end = body.end_time.as_deref().unwrap_or(&existing.end_time);
    let venue = body.venue.as_deref().unwrap_or(&existing.venue);
    if let Err(msg) = validate_slot(date, start, end, venue) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let lecturer_id = body.lecturer_id.unwrap_or(existing.lecturer_id);
    if body.lecturer_id.is_some() || body.session_id.is_some() {
        if let Some(resp) =
            check_references(&storage, existing.course_id, lecturer_id, body.session_id).await?
        {
            return Ok(resp);
        }
    }

    let update = ScheduleUpdate {
        lecturer_id: body.lecturer_id,
        academic_session_id: body.session_id,
        date: body.date.map(|v| v.trim().to_string()),
        start_time: body.start_time.map(|v| v.trim().to_string()),
        end_time: body.end_time.map(|v| v.trim().to_string()),
        venue: body.venue.map(|v| v.trim().to_string()),
    };
    match storage.update_schedule(id, update).await? {
        Some(schedule) => {
            info!("Schedule {} updated", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(schedule, "Schedule updated successfully")))
        }
        None => Ok(schedule_not_found()),
    }
}

pub async fn delete_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.delete_schedule(id).await? {
        info!("Schedule {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Schedule deleted successfully")))
    } else {
        Ok(schedule_not_found())
    }
}
