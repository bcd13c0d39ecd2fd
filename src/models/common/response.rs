use serde::{Deserialize, Serialize};

use super::pagination::PaginationInfo;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
            count: None,
            total_pages: None,
            current_page: None,
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: Some(data),
            error: Some(code.as_str().to_string()),
            count: None,
            total_pages: None,
            current_page: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 不分页的列表响应，count 为条目数
    pub fn list(items: Vec<T>, message: impl Into<String>) -> Self {
        let count = items.len() as i64;
        Self {
            count: Some(count),
            ..Self::success(items, message)
        }
    }

    /// 分页列表响应
    pub fn paginated(items: Vec<T>, pagination: PaginationInfo, message: impl Into<String>) -> Self {
        Self {
            count: Some(pagination.total),
            total_pages: Some(pagination.total_pages),
            current_page: Some(pagination.page),
            ..Self::success(items, message)
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
            count: None,
            total_pages: None,
            current_page: None,
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: Some(code.as_str().to_string()),
            count: None,
            total_pages: None,
            current_page: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::error_empty(ErrorCode::CourseAlreadyExists, "already exists");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "CourseAlreadyExists");
        assert_eq!(json["message"], "already exists");
        assert!(json.get("data").is_none());
        assert!(json.get("totalPages").is_none());
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let resp = ApiResponse::paginated(
            vec![1, 2, 3],
            PaginationInfo {
                page: 2,
                page_size: 3,
                total: 9,
                total_pages: 3,
            },
            "ok",
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 9);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["data"].as_array().map(|a| a.len()), Some(3));
    }
}
