use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

/// 带独立过期时间的缓存条目
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// 条目自带 ttl 时按条目过期，否则由全局 time_to_live 决定
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        entry.ttl
    }
}

/// 进程内缓存，单实例部署时使用
pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
}

impl MokaObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = &AppConfig::get().cache;
        if config.memory.max_capacity == 0 {
            return Err("cache.memory.max_capacity must be greater than 0".to_string());
        }

        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "Moka cache ready (capacity: {}, default ttl: {}s)",
            config.memory.max_capacity, config.default_ttl
        );
        Ok(Self { inner })
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = (ttl > 0).then(|| Duration::from_secs(ttl));
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_ttl_is_honoured() {
        let cache = MokaObjectCache::new().expect("moka cache");
        cache.insert_raw("short".to_string(), "v".to_string(), 1).await;
        cache.insert_raw("long".to_string(), "v".to_string(), 0).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::Found("v".to_string()));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("long").await, CacheResult::Found("v".to_string()));
    }
}
