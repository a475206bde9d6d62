//! Short-lived store that lets a reloaded session resume the application.
//!
//! The record is mirrored after every completed step and dropped once the
//! application is accepted. Entries expire on their own after the configured TTL.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::config::ResumeConfig;
use crate::record::ApplicationRecord;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn load(&self, key: &str) -> Option<ApplicationRecord>;
    async fn save(&self, key: &str, record: &ApplicationRecord);
    async fn remove(&self, key: &str);
}

/// In-process resume store backed by a `moka` cache with time-to-live
#[derive(Debug, Clone)]
pub struct MemoryResumeStore {
    cache: Cache<String, ApplicationRecord>,
}

impl MemoryResumeStore {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn from_config(config: &ResumeConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_minutes * 60), config.max_entries)
    }
}

impl Default for MemoryResumeStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60), 1000)
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn load(&self, key: &str) -> Option<ApplicationRecord> {
        let record = self.cache.get(key).await;
        debug!(key, hit = record.is_some(), "Resume store lookup");
        record
    }

    async fn save(&self, key: &str, record: &ApplicationRecord) {
        self.cache.insert(key.to_string(), record.clone()).await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}
