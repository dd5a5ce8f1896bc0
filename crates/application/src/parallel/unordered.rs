use super::{job, Job, JobAccumulator, Parallel, WorkerPool};
use crate::ports::MetricSink;
use async_trait::async_trait;
use metric_rdns_domain::Metric;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Runs at most `workers` jobs at a time and delivers their output as soon
/// as it is produced, in no particular order.
pub struct Unordered {
    pool: WorkerPool,
    results: mpsc::UnboundedSender<Metric>,
    reader: JoinHandle<()>,
}

impl Unordered {
    pub fn new(sink: Arc<dyn MetricSink>, workers: usize) -> Self {
        let (results, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(forward(rx, sink));
        Self {
            pool: WorkerPool::new(workers),
            results,
            reader,
        }
    }

    pub async fn schedule_fn<F, Fut>(&self, f: F)
    where
        F: FnOnce(JobAccumulator) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule(job(f)).await;
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

#[async_trait]
impl Parallel for Unordered {
    async fn schedule(&self, job: Job) {
        let token = self.pool.checkout().await;
        let pool = self.pool.clone();
        let acc = JobAccumulator::new(self.results.clone());

        tokio::spawn(async move {
            job(acc).await;
            pool.checkin(token);
        });
    }

    async fn wait(self: Box<Self>) {
        let Unordered {
            pool: _,
            results,
            reader,
        } = *self;
        drop(results);

        // Running jobs hold their own senders; the reader ends after the
        // last of them finishes.
        if let Err(e) = reader.await {
            error!(error = %e, "Unordered reader terminated abnormally");
        }
        debug!("Unordered pipeline drained");
    }
}

async fn forward(mut rx: mpsc::UnboundedReceiver<Metric>, sink: Arc<dyn MetricSink>) {
    while let Some(metric) = rx.recv().await {
        sink.pass_metric(metric);
    }
}
