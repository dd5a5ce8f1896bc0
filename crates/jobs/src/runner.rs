use crate::CacheCleanupJob;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Starts the configured background jobs, sharing one shutdown token.
#[derive(Default)]
pub struct JobRunner {
    cache_cleanup: Option<CacheCleanupJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_cleanup(mut self, job: CacheCleanupJob) -> Self {
        self.cache_cleanup = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.cache_cleanup {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}
