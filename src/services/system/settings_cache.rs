//! 运行中可调整的设置
//!
//! 启动时从 `system_settings` 表载入，管理员改设置后立即生效。
//! 表中没有、或值解析失败的项回退到 config.toml。

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

/// `None` 表示尚未从数据库载入
static OVERRIDES: Lazy<RwLock<Option<HashMap<KnownSettingKey, String>>>> =
    Lazy::new(|| RwLock::new(None));

pub struct DynamicConfig;

impl DynamicConfig {
    /// 用数据库中的设置替换全部覆盖值，未知键忽略
    pub async fn init(settings: Vec<(String, String)>) {
        let overrides: HashMap<_, _> = settings
            .into_iter()
            .filter_map(|(key, value)| match key.parse::<KnownSettingKey>() {
                Ok(known) => Some((known, value)),
                Err(_) => {
                    debug!("Ignoring unknown setting '{}'", key);
                    None
                }
            })
            .collect();

        info!("Loaded {} runtime setting(s)", overrides.len());
        *OVERRIDES.write().await = Some(overrides);
    }

    /// 设置修改后的热更新，载入前的修改会被丢弃
    pub async fn update(key: &str, value: &str) {
        let Ok(known) = key.parse::<KnownSettingKey>() else {
            return;
        };
        if let Some(overrides) = OVERRIDES.write().await.as_mut() {
            overrides.insert(known, value.to_string());
            debug!("Runtime setting {} = {}", key, value);
        }
    }

    pub async fn is_initialized() -> bool {
        OVERRIDES.read().await.is_some()
    }

    async fn raw(key: KnownSettingKey) -> Option<String> {
        OVERRIDES
            .read()
            .await
            .as_ref()
            .and_then(|overrides| overrides.get(&key).cloned())
    }

    async fn parsed<T: FromStr>(key: KnownSettingKey) -> Option<T> {
        Self::raw(key).await.and_then(|v| v.trim().parse().ok())
    }

    async fn flag(key: KnownSettingKey) -> Option<bool> {
        match Self::raw(key).await?.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    pub async fn system_name() -> String {
        Self::raw(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 分钟
    pub async fn access_token_expiry() -> i64 {
        Self::parsed(KnownSettingKey::AccessTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.access_token_expiry)
    }

    /// 天
    pub async fn refresh_token_expiry() -> i64 {
        Self::parsed(KnownSettingKey::RefreshTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_expiry)
    }

    /// 天，登录时勾选“记住我”使用
    pub async fn refresh_token_remember_me_expiry() -> i64 {
        Self::parsed(KnownSettingKey::RefreshTokenRememberMeExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_remember_me_expiry)
    }

    pub async fn strict_status_transitions() -> bool {
        Self::flag(KnownSettingKey::StrictStatusTransitions)
            .await
            .unwrap_or(AppConfig::get().enrollment.strict_status_transitions)
    }

    pub async fn allow_self_enroll() -> bool {
        Self::flag(KnownSettingKey::AllowSelfEnroll)
            .await
            .unwrap_or(AppConfig::get().enrollment.allow_self_enroll)
    }

    /// 按字符计，非正数视为无效
    pub async fn chat_max_message_length() -> usize {
        Self::parsed::<usize>(KnownSettingKey::ChatMaxMessageLength)
            .await
            .filter(|v| *v > 0)
            .unwrap_or(AppConfig::get().chat.max_message_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dynamic_values_override_static_config() {
        DynamicConfig::init(vec![
            ("enrollment.allow_self_enroll".to_string(), "false".to_string()),
            ("chat.max_message_length".to_string(), "not-a-number".to_string()),
            ("legacy.unknown_key".to_string(), "x".to_string()),
        ])
        .await;
        assert!(DynamicConfig::is_initialized().await);
        assert!(!DynamicConfig::allow_self_enroll().await);
        assert_eq!(
            DynamicConfig::chat_max_message_length().await,
            AppConfig::get().chat.max_message_length
        );

        DynamicConfig::update("chat.max_message_length", "42").await;
        assert_eq!(DynamicConfig::chat_max_message_length().await, 42);
        DynamicConfig::update("chat.max_message_length", "0").await;
        assert_eq!(
            DynamicConfig::chat_max_message_length().await,
            AppConfig::get().chat.max_message_length
        );
    }
}
