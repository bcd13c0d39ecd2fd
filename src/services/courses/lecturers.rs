use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, BatchResult, ErrorCode,
    courses::{
        entities::{AssignLecturerOutcome, LecturerSyncResult, diff_lecturers},
        requests::LecturerIdsRequest,
    },
};

fn course_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"))
}

pub async fn list_course_lecturers(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(course_not_found());
    }
    let lecturers = storage.list_course_lecturers(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(lecturers, "Course lecturers retrieved")))
}

pub async fn assign_lecturers(
    service: &CourseService,
    id: i64,
    body: LecturerIdsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut lecturer_ids = body.lecturer_ids;
    lecturer_ids.sort_unstable();
    lecturer_ids.dedup();
    if lecturer_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "At least one lecturer is required",
        )));
    }

    let storage = service.get_storage(request)?;
    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(course_not_found());
    }

    // 任一讲师不存在或已分配时整体拒绝，不做任何修改
    for lecturer_id in &lecturer_ids {
        if storage.get_lecturer_by_id(*lecturer_id).await?.is_none() {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LecturerNotFound,
                format!("Lecturer {lecturer_id} not found"),
            )));
        }
        if storage.is_lecturer_assigned(id, *lecturer_id).await? {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::LecturerAlreadyAssigned,
                format!("Lecturer {lecturer_id} is already assigned to this course"),
            )));
        }
    }

    for lecturer_id in &lecturer_ids {
        match storage.assign_lecturer(id, *lecturer_id).await? {
            AssignLecturerOutcome::Assigned | AssignLecturerOutcome::AlreadyAssigned => {}
            AssignLecturerOutcome::LecturerNotFound => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::LecturerNotFound,
                    format!("Lecturer {lecturer_id} not found"),
                )));
            }
        }
    }
    info!("Assigned lecturers {:?} to course {}", lecturer_ids, id);

    let lecturers = storage.list_course_lecturers(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(lecturers, "Lecturers assigned successfully")))
}

pub async fn sync_lecturers(
    service: &CourseService,
    id: i64,
    body: LecturerIdsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(course_not_found());
    }

    let current = storage.list_course_lecturer_ids(id).await?;
    let (to_add, to_remove) = diff_lecturers(&current, &body.lecturer_ids);

    let mut added: BatchResult<i64, i64> = BatchResult::default();
    for lecturer_id in to_add {
        match storage.assign_lecturer(id, lecturer_id).await {
            Ok(AssignLecturerOutcome::Assigned) => added.push_ok(lecturer_id),
            Ok(AssignLecturerOutcome::AlreadyAssigned) => {
                added.push_err(lecturer_id, "Lecturer is already assigned")
            }
            Ok(AssignLecturerOutcome::LecturerNotFound) => {
                added.push_err(lecturer_id, "Lecturer not found")
            }
            Err(e) => added.push_err(lecturer_id, e.message()),
        }
    }

    // 移除时同时删除该讲师在此课程的课表
    let mut removed: BatchResult<i64, i64> = BatchResult::default();
    for lecturer_id in to_remove {
        match storage.unassign_lecturer(id, lecturer_id).await {
            Ok(true) => removed.push_ok(lecturer_id),
            Ok(false) => removed.push_err(lecturer_id, "Lecturer is not assigned"),
            Err(e) => removed.push_err(lecturer_id, e.message()),
        }
    }

    let message = format!(
        "Added: {}; removed: {}",
        added.summary(),
        removed.summary()
    );
    info!("Lecturer sync for course {}: {}", id, message);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LecturerSyncResult { added, removed },
        message,
    )))
}

pub async fn unassign_lecturer(
    service: &CourseService,
    id: i64,
    lecturer_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_course_by_id(id).await?.is_none() {
        return Ok(course_not_found());
    }

    if storage.unassign_lecturer(id, lecturer_id).await? {
        info!("Lecturer {} unassigned from course {}", lecturer_id, id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Lecturer unassigned successfully")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LecturerNotAssigned,
            "Lecturer is not assigned to this course",
        )))
    }
}
