use super::annotate::{annotate_metric, CompiledRule};
use crate::parallel::{job, Ordered, Parallel, Unordered};
use crate::ports::{HostnameLookup, MetricSink};
use metric_rdns_domain::{DomainError, Metric, ReverseDnsConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Annotates metrics with the hostnames of the IP addresses they carry.
///
/// Each metric becomes one pipeline job; lookups for different metrics run
/// concurrently while delivery downstream keeps arrival order unless the
/// processor was configured with `ordered = false`.
pub struct ReverseDnsProcessor {
    rules: Arc<[CompiledRule]>,
    lookup: Arc<dyn HostnameLookup>,
    ordered: bool,
    workers: usize,
    pipeline: Option<Box<dyn Parallel>>,
}

impl ReverseDnsProcessor {
    pub fn new(
        config: &ReverseDnsConfig,
        lookup: Arc<dyn HostnameLookup>,
    ) -> Result<Self, DomainError> {
        let rules = config
            .lookups
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules: rules.into(),
            lookup,
            ordered: config.ordered,
            workers: config.effective_parallel_lookups(),
            pipeline: None,
        })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn is_started(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Builds the pipeline in front of `sink`. Calling it again replaces a
    /// previous pipeline without draining it; call [`stop`](Self::stop)
    /// first.
    pub fn start(&mut self, sink: Arc<dyn MetricSink>) {
        let pipeline: Box<dyn Parallel> = if self.ordered {
            Box::new(Ordered::new(sink, self.workers))
        } else {
            Box::new(Unordered::new(sink, self.workers))
        };
        self.pipeline = Some(pipeline);

        info!(
            rules = self.rules.len(),
            workers = self.workers,
            ordered = self.ordered,
            "Reverse DNS processor started"
        );
    }

    /// Schedules `metric` for annotation. Suspends while the pipeline is
    /// saturated.
    pub async fn add(&self, metric: Metric) -> Result<(), DomainError> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or(DomainError::ProcessorNotStarted)?;

        let rules = Arc::clone(&self.rules);
        let lookup = Arc::clone(&self.lookup);

        pipeline
            .schedule(job(move |acc| async move {
                let mut metric = metric;
                annotate_metric(&mut metric, &rules, lookup.as_ref()).await;
                acc.pass_metric(metric);
            }))
            .await;

        Ok(())
    }

    /// Waits for every scheduled metric to be delivered.
    pub async fn stop(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.wait().await;
            debug!("Reverse DNS processor stopped");
        }
    }
}
