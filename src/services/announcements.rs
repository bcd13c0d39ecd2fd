//! 公告：管理员维护，所有角色按受众与课程成员关系读取

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{
        entities::{AnnouncementUpdate, AnnouncementVisibility, Audience, NewAnnouncement},
        requests::{
            AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
        },
    },
    users::entities::{User, UserRole},
};
use crate::services::current_user;
use crate::storage::Storage;

super::declare_service!(AnnouncementService);

fn announcement_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnnouncementNotFound,
        "Announcement not found",
    ))
}

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

/// 调用者可见的公告范围
async fn visibility_for(storage: &Arc<dyn Storage>, user: &User) -> Result<AnnouncementVisibility> {
    let course_ids = match user.role {
        UserRole::Admin => None,
        UserRole::Student => match storage.get_student_by_user_id(user.id).await? {
            Some(student) => Some(storage.list_student_course_ids(student.id).await?),
            None => Some(Vec::new()),
        },
        UserRole::Lecturer => match storage.get_lecturer_by_user_id(user.id).await? {
            Some(lecturer) => Some(storage.list_lecturer_course_ids(lecturer.id).await?),
            None => Some(Vec::new()),
        },
    };
    Ok(AnnouncementVisibility {
        audiences: Audience::visible_to(&user.role),
        course_ids,
    })
}

impl AnnouncementService {
    pub async fn list_all(
        &self,
        query: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let (page, size) = query.pagination.normalized();
        let result = storage
            .list_announcements_with_pagination(AnnouncementVisibility::default(), page, size)
            .await?;
        Ok(HttpResponse::Ok().json(ApiResponse::paginated(
            result.items,
            result.pagination,
            "Announcements retrieved",
        )))
    }

    /// 当前用户可见的公告
    pub async fn list_visible(
        &self,
        query: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        let visibility = visibility_for(&storage, &user).await?;
        let (page, size) = query.pagination.normalized();

        let result = storage
            .list_announcements_with_pagination(visibility, page, size)
            .await?;
        Ok(HttpResponse::Ok().json(ApiResponse::paginated(
            result.items,
            result.pagination,
            "Announcements retrieved",
        )))
    }

    pub async fn create(
        &self,
        body: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let title = body.title.trim().to_string();
        if title.is_empty() || body.content.trim().is_empty() {
            return Ok(bad_request("Title and content are required"));
        }

        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        if let Some(course_id) = body.course_id
            && storage.get_course_by_id(course_id).await?.is_none()
        {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
        }

        let announcement = storage
            .create_announcement(NewAnnouncement {
                title,
                content: body.content,
                audience: body.audience,
                course_id: body.course_id,
                created_by: user.id,
                is_pinned: body.is_pinned,
            })
            .await?;
        info!("Announcement {} created by user {}", announcement.id, user.id);

        Ok(HttpResponse::Created()
            .json(ApiResponse::success(announcement, "Announcement created successfully")))
    }

    pub async fn get(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_announcement_by_id(id).await? {
            Some(announcement) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(announcement, "Announcement retrieved"))),
            None => Ok(announcement_not_found()),
        }
    }

    pub async fn update(
        &self,
        id: i64,
        body: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let title = body.title.map(|t| t.trim().to_string());
        if title.as_deref().is_some_and(str::is_empty)
            || body.content.as_deref().is_some_and(|c| c.trim().is_empty())
        {
            return Ok(bad_request("Title and content must not be empty"));
        }

        let storage = self.get_storage(request)?;
        if let Some(Some(course_id)) = body.course_id
            && storage.get_course_by_id(course_id).await?.is_none()
        {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
        }

        let update = AnnouncementUpdate {
            title,
            content: body.content,
            audience: body.audience,
            course_id: body.course_id,
            is_pinned: body.is_pinned,
        };
        match storage.update_announcement(id, update).await? {
            Some(announcement) => {
                info!("Announcement {} updated", id);
                Ok(HttpResponse::Ok()
                    .json(ApiResponse::success(announcement, "Announcement updated successfully")))
            }
            None => Ok(announcement_not_found()),
        }
    }

    pub async fn delete(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if storage.delete_announcement(id).await? {
            info!("Announcement {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Announcement deleted successfully")))
        } else {
            Ok(announcement_not_found())
        }
    }
}
