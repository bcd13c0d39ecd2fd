use crate::models::users::entities::StudentProfileInput;
use serde::Deserialize;

// 用户登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 学生自助注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub matric_number: String,
    pub program: String,
    pub department: String,
    pub level: Option<i32>,
}

impl RegisterRequest {
    pub fn student_profile(&self) -> StudentProfileInput {
        StudentProfileInput {
            matric_number: self.matric_number.trim().to_string(),
            program: self.program.trim().to_string(),
            department: self.department.trim().to_string(),
            level: self.level,
        }
    }
}

// 修改密码请求
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
