use metric_rdns_application::ports::MetricSink;
use metric_rdns_domain::Metric;
use std::io::{self, Write};
use tracing::warn;

/// Writes each metric as one JSON line on stdout.
pub struct StdoutSink {
    out: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSink for StdoutSink {
    fn pass_metric(&self, metric: Metric) {
        let line = match serde_json::to_string(&metric) {
            Ok(line) => line,
            Err(e) => {
                warn!(metric = %metric.name, error = %e, "Failed to encode metric");
                return;
            }
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write metric to stdout");
        }
    }
}
