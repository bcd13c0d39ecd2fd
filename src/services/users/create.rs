use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{NewUser, ProfileInput},
        requests::CreateUserRequest,
        responses::CreateUserResponse,
    },
};
use crate::services::hash_password_blocking;
use crate::utils::random_code::generate_password;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

const INITIAL_PASSWORD_LENGTH: usize = 12;

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_full_name(&user_data.full_name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    let profile = match ProfileInput::for_role(&user_data.role, user_data.student, user_data.lecturer)
    {
        Ok(profile) => profile,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };
    if let Some(Err(msg)) = profile.as_ref().map(ProfileInput::validate) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 未提供密码时生成初始密码，仅在响应中返回一次
    let (password, initial_password) = match user_data.password {
        Some(password) => {
            if let Err(msg) = validate_password_simple(&password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
            }
            (password, None)
        }
        None => {
            let generated = generate_password(INITIAL_PASSWORD_LENGTH);
            (generated.clone(), Some(generated))
        }
    };

    let storage = service.get_storage(request)?;

    let (matric, staff_id) = match &profile {
        Some(ProfileInput::Student(p)) => (Some(p.matric_number.trim().to_string()), None),
        Some(ProfileInput::Lecturer(p)) => (None, Some(p.staff_id.trim().to_string())),
        None => (None, None),
    };
    if let Some(field) = storage
        .find_identity_conflict(Some(&email), matric.as_deref(), staff_id.as_deref(), None)
        .await?
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            format!("A user with this {field} already exists"),
        )));
    }

    let password_hash = hash_password_blocking(password).await?;

    let new_user = NewUser {
        full_name: user_data.full_name.trim().to_string(),
        email,
        password_hash,
        role: user_data.role,
        is_active: user_data.is_active,
        must_change_password: true,
    };

    let created = storage.create_user(new_user, profile).await?;
    info!("User {} ({}) created", created.user.id, created.user.role);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateUserResponse {
            user: created,
            initial_password,
        },
        "User created successfully",
    )))
}
