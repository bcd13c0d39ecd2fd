use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, find_delete_blocker};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{ProfileInput, UserUpdate},
        requests::UpdateUserRequest,
    },
};
use crate::services::{current_user, hash_password_blocking, invalidate_user_cache};
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

fn bad_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_user_with_profile(user_id).await? else {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    };

    let full_name = update_data.full_name.map(|n| n.trim().to_string());
    if let Some(ref name) = full_name
        && let Err(msg) = validate_full_name(name)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    let old_role = existing.user.role.clone();
    let new_role = update_data.role.unwrap_or_else(|| old_role.clone());
    let role_changed = new_role != old_role;

    // 管理员不能停用自己或修改自己的角色
    if current.id == user_id && (role_changed || update_data.is_active == Some(false)) {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "You cannot change your own role or deactivate yourself",
        ));
    }

    let profile = if role_changed {
        // 旧档案会被删除，需与删除用户同样检查依赖
        if let Some(blocker) = find_delete_blocker(&storage, &existing).await? {
            return Ok(bad_request(ErrorCode::UserDeleteBlocked, blocker.message()));
        }
        match ProfileInput::for_role(&new_role, update_data.student, update_data.lecturer) {
            Ok(profile) => profile,
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        }
    } else {
        match ProfileInput::for_role(&new_role, update_data.student, update_data.lecturer) {
            Ok(profile) => profile,
            // 角色不变时档案可选
            Err(_) => None,
        }
    };
    if let Some(Err(msg)) = profile.as_ref().map(ProfileInput::validate) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let (matric, staff_id) = match &profile {
        Some(ProfileInput::Student(p)) => (Some(p.matric_number.trim().to_string()), None),
        Some(ProfileInput::Lecturer(p)) => (None, Some(p.staff_id.trim().to_string())),
        None => (None, None),
    };
    if let Some(field) = storage
        .find_identity_conflict(
            email.as_deref(),
            matric.as_deref(),
            staff_id.as_deref(),
            Some(user_id),
        )
        .await?
    {
        return Ok(bad_request(
            ErrorCode::UserAlreadyExists,
            format!("A user with this {field} already exists"),
        ));
    }

    // 管理员重置密码后要求用户下次登录修改
    let (password_hash, must_change_password) = match update_data.password {
        Some(password) => {
            if let Err(msg) = validate_password_simple(&password) {
                return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
            }
            (Some(hash_password_blocking(password).await?), Some(true))
        }
        None => (None, None),
    };

    let update = UserUpdate {
        full_name,
        email,
        password_hash,
        role: role_changed.then_some(new_role),
        is_active: update_data.is_active,
        must_change_password,
        profile,
    };

    match storage.update_user(user_id, update).await? {
        Some(updated) => {
            invalidate_user_cache(request).await;
            info!("User {} updated by {}", user_id, current.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "User updated successfully")))
        }
        None => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
    }
}
