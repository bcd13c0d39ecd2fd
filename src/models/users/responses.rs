use super::entities::UserWithProfile;
use serde::Serialize;

/// 管理员创建用户的响应，仅在系统生成密码时返回一次初始密码
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    #[serde(flatten)]
    pub user: UserWithProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_password: Option<String>,
}
