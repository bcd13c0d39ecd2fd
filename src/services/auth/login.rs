use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::errors::CampusError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::UserWithProfile,
};
use crate::services::{system::DynamicConfig, verify_password_blocking};
use crate::utils::jwt::JwtUtils;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let email = login_request.email.trim().to_lowercase();

    let Some(user) = storage.get_user_by_email(&email).await? else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Email or password is incorrect",
        )));
    };

    if !verify_password_blocking(login_request.password, user.password_hash.clone()).await {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Email or password is incorrect",
        )));
    }

    if !user.is_active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is deactivated, please contact an administrator",
        )));
    }

    storage.update_last_login(user.id).await?;

    let access_minutes = DynamicConfig::access_token_expiry().await;
    let refresh_days = if login_request.remember_me {
        DynamicConfig::refresh_token_remember_me_expiry().await
    } else {
        DynamicConfig::refresh_token_expiry().await
    };

    let token_pair = JwtUtils::generate_token_pair(
        user.id,
        &user.role.to_string(),
        chrono::Duration::minutes(access_minutes),
        chrono::Duration::days(refresh_days),
    )
    .map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        CampusError::internal("Login failed, unable to generate token")
    })?;

    info!("User {} logged in", user.id);

    let access_cookie = JwtUtils::access_token_cookie(&token_pair.access_token, access_minutes);
    let refresh_cookie = JwtUtils::refresh_token_cookie(&token_pair.refresh_token, refresh_days);

    let account = storage
        .get_user_with_profile(user.id)
        .await?
        .unwrap_or(UserWithProfile {
            user,
            student: None,
            lecturer: None,
        });
    let response = LoginResponse::new(token_pair.access_token, access_minutes * 60, account);

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
