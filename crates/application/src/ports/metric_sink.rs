use metric_rdns_domain::Metric;

/// Downstream consumer of processed metrics.
pub trait MetricSink: Send + Sync {
    fn pass_metric(&self, metric: Metric);
}
