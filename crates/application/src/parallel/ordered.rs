use super::{job, Job, JobAccumulator, Parallel};
use crate::ports::MetricSink;
use async_trait::async_trait;
use metric_rdns_domain::Metric;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

type FutureMetrics = mpsc::UnboundedReceiver<Metric>;

/// Runs jobs concurrently but delivers their output in scheduling order.
///
/// The ordering queue holds one future per admitted job and has room for
/// `workers` of them; scheduling past that suspends the caller until the
/// reader catches up.
pub struct Ordered {
    queue: mpsc::Sender<FutureMetrics>,
    reader: JoinHandle<()>,
}

impl Ordered {
    pub fn new(sink: Arc<dyn MetricSink>, workers: usize) -> Self {
        let (queue, pending) = mpsc::channel(workers.max(1));
        let reader = tokio::spawn(drain_in_order(pending, sink));
        Self { queue, reader }
    }

    pub async fn schedule_fn<F, Fut>(&self, f: F)
    where
        F: FnOnce(JobAccumulator) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule(job(f)).await;
    }
}

#[async_trait]
impl Parallel for Ordered {
    async fn schedule(&self, job: Job) {
        let (tx, future) = mpsc::unbounded_channel();

        // The future must be queued before the job starts so the reader sees
        // jobs in exactly the order they were scheduled.
        if self.queue.send(future).await.is_err() {
            warn!("Ordered reader has stopped, dropping job");
            return;
        }

        tokio::spawn(job(JobAccumulator::new(tx)));
    }

    async fn wait(self: Box<Self>) {
        let Ordered { queue, reader } = *self;
        drop(queue);

        if let Err(e) = reader.await {
            error!(error = %e, "Ordered reader terminated abnormally");
        }
        debug!("Ordered pipeline drained");
    }
}

async fn drain_in_order(mut pending: mpsc::Receiver<FutureMetrics>, sink: Arc<dyn MetricSink>) {
    while let Some(mut future) = pending.recv().await {
        while let Some(metric) = future.recv().await {
            sink.pass_metric(metric);
        }
    }
}
