use async_trait::async_trait;
use metric_rdns_domain::DomainError;

/// Outcome of a cache cleanup cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheCleanupOutcome {
    pub entries_expired: usize,
    pub cache_size: usize,
}

/// Port for periodic reverse DNS cache maintenance.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Remove entries whose TTL has lapsed.
    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError>;
}
