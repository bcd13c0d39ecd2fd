use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, find_delete_blocker};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, invalidate_user_cache};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    if current.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete the current user",
        )));
    }

    let storage = service.get_storage(request)?;

    let Some(target) = storage.get_user_with_profile(user_id).await? else {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    };

    if let Some(blocker) = find_delete_blocker(&storage, &target).await? {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserDeleteBlocked,
            blocker.message(),
        )));
    }

    if !storage.delete_user(user_id).await? {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    }

    invalidate_user_cache(request).await;
    info!("User {} deleted by {}", user_id, current.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
