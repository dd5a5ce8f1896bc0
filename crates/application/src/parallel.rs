//! Concurrent job execution in front of a [`MetricSink`].
//!
//! A job is a closure that receives its own [`JobAccumulator`], emits zero or
//! more metrics into it, and finishes. [`Ordered`] delivers the output of
//! jobs in the order they were scheduled; [`Unordered`] delivers output as
//! jobs complete and caps concurrency with a [`WorkerPool`].

pub mod ordered;
pub mod unordered;
pub mod worker_pool;

pub use ordered::Ordered;
pub use unordered::Unordered;
pub use worker_pool::{WorkerPool, WorkerToken};

use crate::ports::MetricSink;
use async_trait::async_trait;
use futures::future::BoxFuture;
use metric_rdns_domain::Metric;
use std::future::Future;
use tokio::sync::mpsc;

/// A boxed unit of work.
pub type Job = Box<dyn FnOnce(JobAccumulator) -> BoxFuture<'static, ()> + Send>;

/// Boxes a closure into a [`Job`].
pub fn job<F, Fut>(f: F) -> Job
where
    F: FnOnce(JobAccumulator) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move |acc| Box::pin(f(acc)))
}

/// Accumulator scoped to a single job. The job's output is complete once
/// the accumulator is dropped.
pub struct JobAccumulator {
    tx: mpsc::UnboundedSender<Metric>,
}

impl JobAccumulator {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Metric>) -> Self {
        Self { tx }
    }
}

impl MetricSink for JobAccumulator {
    fn pass_metric(&self, metric: Metric) {
        // The reader only goes away after every accumulator is dropped.
        let _ = self.tx.send(metric);
    }
}

#[async_trait]
pub trait Parallel: Send + Sync {
    /// Admits a job, suspending the caller while the pipeline is saturated.
    async fn schedule(&self, job: Job);

    /// Stops accepting work and waits until every scheduled job has been
    /// delivered downstream.
    async fn wait(self: Box<Self>);
}
