use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 清除令牌 Cookie 与缓存中的认证用户
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = JwtUtils::extract_access_token(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&user_cache_key(&token)).await;
    }

    let mut response = HttpResponse::Ok();
    for cookie in JwtUtils::cleared_cookies() {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::success_empty("Logged out")))
}
