use super::reverse_cache::ReverseDnsCache;

use async_trait::async_trait;
use metric_rdns_application::ports::{CacheCleanupOutcome, CacheMaintenancePort};
use metric_rdns_domain::DomainError;
use tracing::debug;

/// Infrastructure adapter implementing `CacheMaintenancePort`.
pub struct ReverseDnsCacheMaintenance {
    cache: ReverseDnsCache,
}

impl ReverseDnsCacheMaintenance {
    pub fn new(cache: ReverseDnsCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheMaintenancePort for ReverseDnsCacheMaintenance {
    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError> {
        let outcome = self.cache.cleanup();

        let stats = self.cache.stats();
        debug!(
            expired = outcome.entries_expired,
            cache_size = outcome.cache_size,
            hits = stats.cache_hit,
            misses = stats.cache_miss,
            hit_rate = format!("{:.1}%", self.cache.metrics().hit_rate()),
            "Reverse DNS cache cleanup cycle"
        );

        Ok(outcome)
    }
}
