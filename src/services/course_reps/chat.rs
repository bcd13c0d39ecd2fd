//! 课程聊天：仅管理员、任课讲师与课代表可读写

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::CourseRepService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    course_reps::requests::{ChatHistoryParams, SendMessageRequest},
    users::entities::{User, UserRole},
};
use crate::services::{current_user, system::DynamicConfig};
use crate::storage::Storage;

async fn can_chat(storage: &Arc<dyn Storage>, user: &User, course_id: i64) -> Result<bool> {
    match user.role {
        UserRole::Admin => Ok(true),
        UserRole::Lecturer => match storage.get_lecturer_by_user_id(user.id).await? {
            Some(lecturer) => storage.is_lecturer_assigned(course_id, lecturer.id).await,
            None => Ok(false),
        },
        UserRole::Student => match storage.get_student_by_user_id(user.id).await? {
            Some(student) => storage.is_course_rep(course_id, student.id).await,
            None => Ok(false),
        },
    }
}

/// 课程存在且调用者有聊天权限，否则返回对应的错误响应
async fn authorize(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<Option<HttpResponse>> {
    if storage.get_course_by_id(course_id).await?.is_none() {
        return Ok(Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))));
    }
    if !can_chat(storage, user, course_id).await? {
        return Ok(Some(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ChatPermissionDenied,
            "Only course reps, assigned lecturers and admins can use this chat",
        ))));
    }
    Ok(None)
}

pub async fn list_messages(
    service: &CourseRepService,
    course_id: i64,
    query: ChatHistoryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    if let Some(resp) = authorize(&storage, &user, course_id).await? {
        return Ok(resp);
    }

    let (page, size) = query.pagination.normalized();
    let result = storage.list_chat_messages(course_id, page, size).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        result.items,
        result.pagination,
        "Messages retrieved",
    )))
}

pub async fn send_message(
    service: &CourseRepService,
    course_id: i64,
    body: SendMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let max_length = DynamicConfig::chat_max_message_length().await;
    let content = match body.validate(max_length) {
        Ok(content) => content.to_string(),
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    if let Some(resp) = authorize(&storage, &user, course_id).await? {
        return Ok(resp);
    }

    let message = storage.create_chat_message(course_id, &user, &content).await?;
    debug!("User {} posted message {} in course {}", user.id, message.id, course_id);

    Ok(HttpResponse::Created().json(ApiResponse::success(message, "Message sent")))
}
