//! 统一错误处理模块
//!
//! 错误枚举由宏生成，每个变体带错误码与类型名。
//! `CampusError` 同时实现 `ResponseError`，服务层可直接用 `?` 传播到统一的 JSON 信封。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_campus_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CampusError {
            $($variant(String),)*
        }

        impl CampusError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CampusError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CampusError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CampusError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl CampusError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CampusError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

// 基础设施错误在前，面向客户端的业务错误在后
define_campus_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Internal("E006", "Internal Error"),
    Validation("E101", "Validation Error"),
    NotFound("E102", "Resource Not Found"),
    Conflict("E103", "Conflict"),
    Authentication("E104", "Authentication Error"),
    Authorization("E105", "Authorization Error"),
}

impl CampusError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CampusError::Validation(_) => ErrorCode::BadRequest,
            CampusError::Conflict(_) => ErrorCode::Conflict,
            CampusError::NotFound(_) => ErrorCode::NotFound,
            CampusError::Authentication(_) => ErrorCode::Unauthorized,
            CampusError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 是否属于客户端可见的业务错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// 面向客户端的错误信息，非开发环境下隐藏内部细节
    fn public_message(&self) -> String {
        if self.is_client_error() || AppConfig::get().is_development() {
            self.message().to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}

impl fmt::Display for CampusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CampusError {}

impl ResponseError for CampusError {
    fn status_code(&self) -> StatusCode {
        match self {
            CampusError::Validation(_) | CampusError::Conflict(_) => StatusCode::BAD_REQUEST,
            CampusError::NotFound(_) => StatusCode::NOT_FOUND,
            CampusError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CampusError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.is_client_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.error_code(), self.public_message()))
    }
}

impl From<sea_orm::DbErr> for CampusError {
    fn from(err: sea_orm::DbErr) -> Self {
        CampusError::DatabaseOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CampusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CampusError::cache_connection("test").code(), "E001");
        assert_eq!(CampusError::database_config("test").code(), "E003");
        assert_eq!(CampusError::internal("test").code(), "E006");
        assert_eq!(CampusError::validation("test").code(), "E101");
        assert_eq!(CampusError::conflict("test").code(), "E103");
        assert_eq!(CampusError::authentication("test").code(), "E104");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            CampusError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            CampusError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CampusError::conflict("Course code already exists").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CampusError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CampusError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CampusError::authorization("no").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CampusError::authentication("no").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CampusError::database_operation("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_business_error_codes() {
        assert_eq!(
            CampusError::conflict("dup").error_code(),
            ErrorCode::Conflict
        );
        assert_eq!(
            CampusError::database_operation("x").error_code(),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_format_simple() {
        let err = CampusError::validation("Invalid course code");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid course code"));
    }
}
