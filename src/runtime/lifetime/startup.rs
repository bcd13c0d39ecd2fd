use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::build_object_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{NewUser, UserRole};
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::{password::hash_password, random_code::generate_password};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
/// 从 system_settings 表加载动态配置，失败时使用空配置
async fn init_dynamic_config(storage: &Arc<dyn Storage>) {
    match storage.list_all_settings().await {
        Ok(settings) => {
            DynamicConfig::init(settings.into_iter().map(|s| (s.key, s.value)).collect()).await;
        }
        Err(e) => {
            warn!(
                "Failed to load dynamic config from database: {}, using defaults",
                e
            );
            DynamicConfig::init(vec![]).await;
        }
    }
}

/// 没有任何管理员时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users_by_role(&UserRole::Admin).await {
        Ok(count) if count > 0 => {
            debug!("Found {} admin account(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No admin account found, creating default admin..."),
        Err(e) => {
            warn!("Failed to count admin accounts: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", generated);
        warn!("  Log in as {} and change it", DEFAULT_ADMIN_EMAIL);
        warn!("==========================================================");
        generated
    });

    let password_hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await
    {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
        Err(e) => {
            warn!("Password hashing task failed: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = NewUser {
        full_name: "Administrator".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password_hash,
        role: UserRole::Admin,
        is_active: true,
        must_change_password: true,
    };

    match storage.create_user(admin, None).await {
        Ok(created) => info!(
            "Default admin account created (ID: {}, email: {})",
            created.user.id, created.user.email
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动上下文：存储（含迁移）、动态配置、默认管理员与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    init_dynamic_config(&storage).await;
    seed_admin(&storage).await;

    let cache = build_object_cache(&AppConfig::get().cache.cache_type).await?;

    Ok(StartupContext { storage, cache })
}
