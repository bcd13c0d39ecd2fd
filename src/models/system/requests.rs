use serde::Deserialize;
use serde_json::Value;

use crate::models::common::PaginationQuery;

/// 修改单个设置
///
/// 前端可能直接发送 `true` 或 `30`，统一转成字符串后再按设置类型校验。
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingRequest {
    value: Value,
}

impl UpdateSettingRequest {
    pub fn raw_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// 审计日志查询，`key` 为空时返回全部设置的变更
#[derive(Debug, Clone, Deserialize)]
pub struct SettingAuditParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    key: Option<String>,
}

impl SettingAuditParams {
    pub fn key_filter(&self) -> Option<String> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_value_accepts_json_scalars() {
        let body: UpdateSettingRequest = serde_json::from_str(r#"{"value": true}"#).unwrap();
        assert_eq!(body.raw_value(), "true");
        let body: UpdateSettingRequest = serde_json::from_str(r#"{"value": 500}"#).unwrap();
        assert_eq!(body.raw_value(), "500");
        let body: UpdateSettingRequest = serde_json::from_str(r#"{"value": "Campus"}"#).unwrap();
        assert_eq!(body.raw_value(), "Campus");
    }

    #[test]
    fn test_blank_audit_key_is_ignored() {
        let params: SettingAuditParams = serde_json::from_str(r#"{"key": "  "}"#).unwrap();
        assert_eq!(params.key_filter(), None);
        assert_eq!(params.pagination.page, 1);
    }
}
