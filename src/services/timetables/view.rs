use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TimetableService, timetable_not_found};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    timetables::{
        entities::{ExamSessionScope, ExamTimetableDetail},
        requests::{TimetableListParams, TimetableListQuery},
    },
    users::entities::{User, UserRole},
};
use crate::services::{current_lecturer, current_student, current_user};
use crate::storage::Storage;

/// 按调用者角色确定可见场次
async fn scope_for(
    storage: &Arc<dyn Storage>,
    user: &User,
    request: &HttpRequest,
) -> ActixResult<ExamSessionScope> {
    let scope = match user.role {
        UserRole::Admin => ExamSessionScope::All,
        UserRole::Student => {
            let student = current_student(storage, request).await?;
            ExamSessionScope::Courses(storage.list_student_course_ids(student.id).await?)
        }
        UserRole::Lecturer => {
            let lecturer = current_lecturer(storage, request).await?;
            ExamSessionScope::Lecturer {
                lecturer_id: lecturer.id,
                course_ids: storage.list_lecturer_course_ids(lecturer.id).await?,
            }
        }
    };
    Ok(scope)
}

async fn visible_detail(
    storage: &Arc<dyn Storage>,
    id: i64,
    scope: &ExamSessionScope,
) -> Result<Option<ExamTimetableDetail>> {
    let Some(timetable) = storage.get_timetable_by_id(id).await? else {
        return Ok(None);
    };
    // 草稿只对管理员可见
    if !timetable.is_published && *scope != ExamSessionScope::All {
        return Ok(None);
    }
    let sessions = storage.list_exam_sessions(id, scope).await?;
    Ok(Some(ExamTimetableDetail {
        timetable,
        sessions,
    }))
}

pub async fn list_visible(
    service: &TimetableService,
    query: TimetableListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let (page, size) = query.pagination.normalized();

    let result = storage
        .list_timetables_with_pagination(TimetableListQuery {
            page,
            size,
            session_id: query.session_id,
            published_only: user.role != UserRole::Admin,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        result.items,
        result.pagination,
        "Exam timetables retrieved",
    )))
}

pub async fn get_visible(
    service: &TimetableService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = scope_for(&storage, &user, request).await?;

    match visible_detail(&storage, id, &scope).await? {
        Some(detail) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Exam timetable retrieved")))
        }
        None => Ok(timetable_not_found()),
    }
}
