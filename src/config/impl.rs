use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 部署时常用的短环境变量，优先级高于配置文件和 `CAMPUS_*`
const ENV_SHORTCUTS: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("CACHE_TTL", "cache.default_ttl"),
    ("ALLOW_SELF_ENROLL", "enrollment.allow_self_enroll"),
];

const PLACEHOLDER_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 依次合并 config.toml、config.{env}.toml、`CAMPUS_*` 与短环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{}", Self::env_name())).required(false))
            .add_source(
                Environment::with_prefix("CAMPUS")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_SHORTCUTS {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers).max(1);
        }
        app_config.validate()?;

        Ok(app_config)
    }

    /// 拒绝会让服务在运行中才出错的配置
    fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && (self.jwt.secret.is_empty() || self.jwt.secret == PLACEHOLDER_SECRET)
        {
            return Err(ConfigError::Message(
                "jwt.secret must be set to a private value in production".to_string(),
            ));
        }
        if self.enrollment.batch_limit == 0 || self.enrollment.import_max_rows == 0 {
            return Err(ConfigError::Message(
                "enrollment.batch_limit and enrollment.import_max_rows must be positive".to_string(),
            ));
        }
        if self.chat.max_message_length == 0 {
            return Err(ConfigError::Message(
                "chat.max_message_length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 首次访问时加载，加载失败直接退出进程
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用，让配置错误以 Err 形式返回给 main
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn env_name() -> String {
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_loads() {
        let config = AppConfig::load().expect("config.toml should load");
        assert!(config.server.workers >= 1);
        assert!(config.enrollment.batch_limit > 0);
        assert!(config.argon2.memory_cost > 0);
        assert_eq!(
            config.server_bind_address(),
            format!("{}:{}", config.server.host, config.server.port)
        );
    }

    #[test]
    fn test_placeholder_secret_rejected_in_production() {
        let mut config = AppConfig::load().expect("config.toml should load");
        config.app.environment = "production".to_string();
        config.jwt.secret = PLACEHOLDER_SECRET.to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());

        config.chat.max_message_length = 0;
        assert!(config.validate().is_err());
    }
}
