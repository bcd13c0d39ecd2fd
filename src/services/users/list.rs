use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::requests::{UserListParams, UserListQuery},
};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let page = storage
        .list_users_with_pagination(UserListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        page.items,
        page.pagination,
        "User list retrieved successfully",
    )))
}
