//! 业务逻辑层
//!
//! 每个资源一个服务，服务方法接收已解析的请求并返回完整的 HTTP 响应。
//! 存储与当前用户均从请求中获取，路由层通过全局懒加载实例调用。

pub mod academic_sessions;
pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod course_reps;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod faqs;
pub mod schedules;
pub mod system;
pub mod timetables;
pub mod users;

pub use academic_sessions::AcademicSessionService;
pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use course_reps::CourseRepService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use enrollments::EnrollmentService;
pub use faqs::FaqService;
pub use schedules::ScheduleService;
pub use system::SystemService;
pub use timetables::TimetableService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpRequest, Result as ActixResult, web};

use crate::errors::CampusError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::{LecturerProfile, StudentProfile, User};
use crate::storage::Storage;
use crate::utils::password::hash_password;

/// 声明一个服务，存储从请求的 app data 中读取
macro_rules! declare_service {
    ($name:ident) => {
        pub struct $name;

        impl $name {
            pub fn new_lazy() -> Self {
                Self
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> actix_web::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                $crate::services::storage_from_request(request)
            }
        }
    };
}
pub(crate) use declare_service;

/// 从 app data 读取存储
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| CampusError::database_config("Storage is not registered").into())
}

/// 当前登录用户，需在 RequireJWT 之后调用
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| CampusError::authentication("Authentication required").into())
}

/// 当前用户的学生档案
pub(crate) async fn current_student(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> ActixResult<StudentProfile> {
    let user = current_user(request)?;
    storage
        .get_student_by_user_id(user.id)
        .await?
        .ok_or_else(|| CampusError::authorization("Student profile not found").into())
}

/// 当前用户的讲师档案
pub(crate) async fn current_lecturer(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> ActixResult<LecturerProfile> {
    let user = current_user(request)?;
    storage
        .get_lecturer_by_user_id(user.id)
        .await?
        .ok_or_else(|| CampusError::authorization("Lecturer profile not found").into())
}

/// 在阻塞线程池中计算密码哈希
pub(crate) async fn hash_password_blocking(password: String) -> ActixResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CampusError::internal(format!("Password hashing task failed: {e}")))??;
    Ok(hash)
}

/// 在阻塞线程池中校验密码
pub(crate) async fn verify_password_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || crate::utils::password::verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

/// 用户被修改或删除后清空认证缓存，缓存按令牌索引无法定位单个用户
pub(crate) async fn invalidate_user_cache(request: &HttpRequest) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn crate::cache::ObjectCache>>>() {
        cache.invalidate_all().await;
    }
}
