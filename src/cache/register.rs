//! 缓存插件注册表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在进程启动前登记构造函数，
//! 启动阶段再按 `cache.type` 取出并构造。

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::cache::ObjectCache;
use crate::errors::{CampusError, Result};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 所有部署都能用的内存后端
pub const FALLBACK_CACHE: &str = "moka";

// BTreeMap 保证列出的插件名有序
static PLUGINS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

fn read_plugins() -> RwLockReadGuard<'static, BTreeMap<String, ObjectCacheConstructor>> {
    PLUGINS.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_plugins() -> RwLockWriteGuard<'static, BTreeMap<String, ObjectCacheConstructor>> {
    PLUGINS.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 同名插件后注册者覆盖
pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    write_plugins().insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    read_plugins().get(name).cloned()
}

pub fn registered_object_cache_plugins() -> Vec<String> {
    read_plugins().keys().cloned().collect()
}

async fn try_build(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' is not registered", name);
        return None;
    };
    match constructor().await {
        Ok(cache) => Some(Arc::from(cache)),
        Err(e) => {
            warn!("Failed to create '{}' cache backend: {}", name, e);
            None
        }
    }
}

/// 构造配置的后端，不可用时回退到内存缓存
pub async fn build_object_cache(preferred: &str) -> Result<Arc<dyn ObjectCache>> {
    debug!(
        "Cache plugins available: {}",
        registered_object_cache_plugins().join(", ")
    );

    if let Some(cache) = try_build(preferred).await {
        info!("Using '{}' cache backend", preferred);
        return Ok(cache);
    }

    if preferred != FALLBACK_CACHE {
        warn!("Falling back to in-memory '{}' cache", FALLBACK_CACHE);
        if let Some(cache) = try_build(FALLBACK_CACHE).await {
            return Ok(cache);
        }
    }

    Err(CampusError::cache_plugin_not_found(format!(
        "No cache backend available (configured: {preferred})"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_registered() {
        let names = registered_object_cache_plugins();
        assert_eq!(names, vec!["moka".to_string(), "redis".to_string()]);
        assert!(get_object_cache_plugin("memcached").is_none());
    }

    #[tokio::test]
    async fn test_unknown_backend_falls_back_to_memory() {
        let cache = build_object_cache("memcached").await.expect("fallback cache");
        cache.insert_raw("user:t".to_string(), "{}".to_string(), 0).await;
        assert_eq!(
            cache.get_raw("user:t").await,
            crate::cache::CacheResult::Found("{}".to_string())
        );
    }
}
