use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode, auth::responses::RefreshTokenResponse};
use crate::services::{current_user, system::DynamicConfig};
use crate::utils::jwt::JwtUtils;

fn refresh_rejected(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::cleared_refresh_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

/// 用 refresh_token Cookie 换取新的 Access Token，用户被停用或删除时拒绝
pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(refresh_rejected("Login expired or invalid, please login again"));
        }
    };

    let Ok(user_id) = claims.user_id() else {
        return Ok(refresh_rejected("Login expired or invalid, please login again"));
    };

    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(refresh_rejected("Account is unavailable, please login again")),
    };

    let access_minutes = DynamicConfig::access_token_expiry().await;
    let access_token = JwtUtils::generate_access_token(
        user.id,
        &user.role.to_string(),
        Some(chrono::Duration::minutes(access_minutes)),
    )
    .map_err(|e| {
        error!("Failed to generate access token: {}", e);
        CampusError::internal("Unable to generate token")
    })?;

    let cookie = JwtUtils::access_token_cookie(&access_token, access_minutes);
    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
        RefreshTokenResponse::new(access_token, access_minutes * 60),
        "Token refreshed successfully",
    )))
}

/// 当前用户及其学生或讲师档案
pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_user_with_profile(user.id).await? {
        Some(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
    }
}
