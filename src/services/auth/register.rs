use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::entities::{NewUser, ProfileInput, UserRole},
};
use crate::services::hash_password_blocking;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let email = register_request.email.trim().to_lowercase();

    if let Err(msg) = validate_full_name(&register_request.full_name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let profile = ProfileInput::Student(register_request.student_profile());
    if let Err(msg) = profile.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;

    let matric = register_request.matric_number.trim().to_string();
    if let Some(field) = storage
        .find_identity_conflict(Some(&email), Some(&matric), None, None)
        .await?
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            format!("A user with this {field} already exists"),
        )));
    }

    let password_hash = hash_password_blocking(register_request.password).await?;

    let new_user = NewUser {
        full_name: register_request.full_name.trim().to_string(),
        email,
        password_hash,
        role: UserRole::Student,
        is_active: true,
        must_change_password: false,
    };

    let created = storage.create_user(new_user, Some(profile)).await?;
    info!("Student {} registered", created.user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Registration successful")))
}
