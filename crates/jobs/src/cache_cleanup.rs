use metric_rdns_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10);

/// Periodically sweeps expired reverse DNS records.
pub struct CacheCleanupJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheCleanupJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            interval: DEFAULT_CLEANUP_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting reverse DNS cache cleanup job"
        );

        let job = Arc::clone(&self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(job.interval);
            loop {
                tokio::select! {
                    _ = job.shutdown.cancelled() => {
                        info!("CacheCleanupJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        job.run_once().await;
                    }
                }
            }
        });
    }

    async fn run_once(&self) {
        match self.maintenance.run_cleanup_cycle().await {
            Ok(outcome) => {
                if outcome.entries_expired > 0 {
                    info!(
                        entries_expired = outcome.entries_expired,
                        cache_size = outcome.cache_size,
                        "Reverse DNS cache cleanup completed"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Reverse DNS cache cleanup failed");
            }
        }
    }
}
