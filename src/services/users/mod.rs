pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::users::{
    entities::{UserDeleteBlocker, UserRole, UserWithProfile},
    requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
};
use crate::storage::Storage;

super::declare_service!(UserService);

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

/// 检查用户是否仍被依赖（最后一个管理员、在读选课、任课）
pub(crate) async fn find_delete_blocker(
    storage: &Arc<dyn Storage>,
    target: &UserWithProfile,
) -> Result<Option<UserDeleteBlocker>> {
    let role = &target.user.role;
    let admin_count = match role {
        UserRole::Admin => storage.count_users_by_role(&UserRole::Admin).await?,
        _ => 0,
    };
    let active_enrollments = match &target.student {
        Some(student) => storage.count_active_enrollments_for_student(student.id).await?,
        None => 0,
    };
    let assigned_courses = match &target.lecturer {
        Some(lecturer) => storage.count_courses_for_lecturer(lecturer.id).await?,
        None => 0,
    };
    Ok(UserDeleteBlocker::check(
        role,
        admin_count,
        active_enrollments,
        assigned_courses,
    ))
}
