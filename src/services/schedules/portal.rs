use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::{
    ApiResponse,
    schedules::requests::{ScheduleListParams, ScheduleListQuery},
};
use crate::services::{current_lecturer, current_student};

/// 讲师本人的课表
pub async fn lecturer_schedules(
    service: &ScheduleService,
    query: ScheduleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let lecturer = current_lecturer(&storage, request).await?;

    let mut query = ScheduleListQuery::from(query);
    query.lecturer_id = Some(lecturer.id);

    let page = storage.list_schedules_with_pagination(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "Schedules retrieved",
    )))
}

/// 学生在读课程的课表，指定 course_id 时只返回其中属于自己的课程
pub async fn student_schedules(
    service: &ScheduleService,
    query: ScheduleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = current_student(&storage, request).await?;
    let course_ids = storage.list_student_course_ids(student.id).await?;

    let mut query = ScheduleListQuery::from(query);
    query.lecturer_id = None;
    query.course_ids = Some(match query.course_ids.take() {
        Some(requested) => requested
            .into_iter()
            .filter(|id| course_ids.contains(id))
            .collect(),
        None => course_ids,
    });

    let page = storage.list_schedules_with_pagination(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "Schedules retrieved",
    )))
}
