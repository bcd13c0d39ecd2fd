use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse,
    courses::requests::{CourseListParams, CourseListQuery},
};

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = storage
        .list_courses_with_pagination(CourseListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "Course list retrieved successfully",
    )))
}
