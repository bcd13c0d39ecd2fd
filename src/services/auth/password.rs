use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::info;

use super::AuthService;
use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::ChangePasswordRequest,
    users::entities::UserUpdate,
};
use crate::services::{current_user, hash_password_blocking, verify_password_blocking};
use crate::utils::jwt::JwtUtils;
use crate::utils::validate::validate_password_simple;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 缓存中的用户不含密码哈希，需重新读取
    let Some(user) = storage.get_user_by_id(current.id).await? else {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    };

    if !verify_password_blocking(change_request.current_password, user.password_hash.clone()).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        )));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    if verify_password_blocking(change_request.new_password.clone(), user.password_hash).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            "New password must differ from the current password",
        )));
    }

    let password_hash = hash_password_blocking(change_request.new_password).await?;
    storage
        .update_user(
            user.id,
            UserUpdate {
                password_hash: Some(password_hash),
                must_change_password: Some(false),
                ..Default::default()
            },
        )
        .await?;

    if let Some(token) = JwtUtils::extract_access_token(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&user_cache_key(&token)).await;
    }

    info!("User {} changed password", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
}
