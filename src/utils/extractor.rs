//! 路径参数提取器
//!
//! 将路径中的数字 ID 解析为正整数，非法值直接返回 400 信封，而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn invalid_param(param: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(value) => format!("Invalid path parameter '{param}': '{value}'"),
        None => format!("Missing path parameter '{param}'"),
    };
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 定义一个从命名路径参数提取 i64 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready($crate::utils::extractor::extract_i64_param(
                    req, $param,
                )
                .map($name))
            }
        }
    };
}

pub fn extract_i64_param(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param);
    raw.and_then(parse_positive_id)
        .ok_or_else(|| invalid_param(param, raw))
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeLecturerIdI64, "lecturer_id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");
define_safe_i64_extractor!(SafeSessionIdI64, "session_id");

/// 非空字符串路径参数（院系名称、配置键等）
#[derive(Debug, Clone)]
pub struct SafeNameParam(pub String);

impl FromRequest for SafeNameParam {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("name");
        let result = match raw.map(str::trim) {
            Some(value) if !value.is_empty() && value.len() <= 128 => {
                Ok(SafeNameParam(value.to_string()))
            }
            other => Err(invalid_param("name", other)),
        };
        ready(result)
    }
}

/// 配置键：形如 `section.key`，仅允许小写字母、数字、下划线和点
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

pub fn is_valid_setting_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key.contains('.')
        && !key.starts_with('.')
        && !key.ends_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
}

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("key");
        let result = match raw {
            Some(key) if is_valid_setting_key(key) => Ok(SafeSettingKey(key.to_string())),
            other => Err(invalid_param("key", other)),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id(" 7 "), Some(7));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
        assert_eq!(parse_positive_id("1e3"), None);
    }

    #[test]
    fn test_setting_key_validation() {
        assert!(is_valid_setting_key("enrollment.strict_status_transitions"));
        assert!(is_valid_setting_key("jwt.access_token_expiry"));
        assert!(!is_valid_setting_key("nodot"));
        assert!(!is_valid_setting_key(".leading"));
        assert!(!is_valid_setting_key("Upper.Case"));
        assert!(!is_valid_setting_key("a.b;drop"));
    }
}
