use async_trait::async_trait;
use metric_rdns_application::ports::{CacheCleanupOutcome, CacheMaintenancePort};
use metric_rdns_domain::DomainError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockCacheMaintenancePort {
    cleanup_call_count: Arc<AtomicU64>,
    should_fail: Arc<RwLock<bool>>,
    outcome: CacheCleanupOutcome,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            cleanup_call_count: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(RwLock::new(false)),
            outcome: CacheCleanupOutcome::default(),
        }
    }

    pub fn with_outcome(entries_expired: usize, cache_size: usize) -> Self {
        Self {
            outcome: CacheCleanupOutcome {
                entries_expired,
                cache_size,
            },
            ..Self::new()
        }
    }

    pub fn cleanup_call_count(&self) -> u64 {
        self.cleanup_call_count.load(Ordering::Relaxed)
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError> {
        self.cleanup_call_count.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.read().await {
            return Err(DomainError::IoError("cleanup failed".to_string()));
        }
        Ok(self.outcome.clone())
    }
}
