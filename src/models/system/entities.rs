use serde::{Deserialize, Serialize};

/// 配置值类型
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SettingValueType {
    String,
    Integer,
    Boolean,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SettingValueType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer, boolean"
            ))
        })
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Boolean => write!(f, "boolean"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "boolean" => Ok(SettingValueType::Boolean),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownSettingKey {
    SystemName,
    AccessTokenExpiry,
    RefreshTokenExpiry,
    RefreshTokenRememberMeExpiry,
    StrictStatusTransitions,
    AllowSelfEnroll,
    ChatMaxMessageLength,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::RefreshTokenExpiry => "jwt.refresh_token_expiry",
            KnownSettingKey::RefreshTokenRememberMeExpiry => "jwt.refresh_token_remember_me_expiry",
            KnownSettingKey::StrictStatusTransitions => "enrollment.strict_status_transitions",
            KnownSettingKey::AllowSelfEnroll => "enrollment.allow_self_enroll",
            KnownSettingKey::ChatMaxMessageLength => "chat.max_message_length",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName => SettingValueType::String,
            KnownSettingKey::AccessTokenExpiry
            | KnownSettingKey::RefreshTokenExpiry
            | KnownSettingKey::RefreshTokenRememberMeExpiry
            | KnownSettingKey::ChatMaxMessageLength => SettingValueType::Integer,
            KnownSettingKey::StrictStatusTransitions | KnownSettingKey::AllowSelfEnroll => {
                SettingValueType::Boolean
            }
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            KnownSettingKey::SystemName,
            KnownSettingKey::AccessTokenExpiry,
            KnownSettingKey::RefreshTokenExpiry,
            KnownSettingKey::RefreshTokenRememberMeExpiry,
            KnownSettingKey::StrictStatusTransitions,
            KnownSettingKey::AllowSelfEnroll,
            KnownSettingKey::ChatMaxMessageLength,
        ]
    }

    /// 校验配置值，返回规范化后的字符串
    pub fn validate_value(&self, value: &str) -> Result<String, String> {
        let value = value.trim();
        match self.value_type() {
            SettingValueType::String => {
                if value.is_empty() || value.chars().count() > 128 {
                    return Err("Value must be 1-128 characters".to_string());
                }
                Ok(value.to_string())
            }
            SettingValueType::Integer => {
                let n: i64 = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not an integer"))?;
                let (min, max) = match self {
                    KnownSettingKey::AccessTokenExpiry => (1, 24 * 60),
                    KnownSettingKey::ChatMaxMessageLength => (1, 20_000),
                    _ => (1, 365),
                };
                if !(min..=max).contains(&n) {
                    return Err(format!("Value must be between {min} and {max}"));
                }
                Ok(n.to_string())
            }
            SettingValueType::Boolean => match value {
                "true" | "1" => Ok("true".to_string()),
                "false" | "0" => Ok("false".to_string()),
                _ => Err(format!("'{value}' is not a boolean")),
            },
        }
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::all()
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 设置审计日志实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingAudit {
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_round_trip() {
        for key in KnownSettingKey::all() {
            assert_eq!(key.as_str().parse::<KnownSettingKey>().unwrap(), key);
        }
        assert!("upload.max_size".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_value_validation() {
        let strict = KnownSettingKey::StrictStatusTransitions;
        assert_eq!(strict.validate_value(" 1 ").unwrap(), "true");
        assert!(strict.validate_value("yes").is_err());

        let expiry = KnownSettingKey::AccessTokenExpiry;
        assert_eq!(expiry.validate_value("90").unwrap(), "90");
        assert!(expiry.validate_value("0").is_err());
        assert!(expiry.validate_value("abc").is_err());

        assert!(KnownSettingKey::SystemName.validate_value("  ").is_err());
    }
}
