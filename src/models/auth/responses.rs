use serde::Serialize;

use crate::models::users::entities::UserWithProfile;

const BEARER: &str = "Bearer";

/// 登录成功后返回的令牌与账户信息
///
/// `account` 带上学生或讲师档案，前端据此决定进入哪个门户。
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// 秒
    pub expires_in: i64,
    pub account: UserWithProfile,
    pub must_change_password: bool,
}

impl LoginResponse {
    pub fn new(access_token: String, expires_in: i64, account: UserWithProfile) -> Self {
        Self {
            must_change_password: account.user.must_change_password,
            token_type: BEARER,
            access_token,
            expires_in,
            account,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl RefreshTokenResponse {
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: BEARER,
            expires_in,
        }
    }
}
