use crate::ports::HostnameLookup;
use metric_rdns_domain::{DomainError, FieldValue, LookupRule, LookupSource, Metric};
use std::net::IpAddr;
use tracing::trace;

/// A validated lookup rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub source: LookupSource,
    pub dest: String,
}

impl CompiledRule {
    pub fn compile(index: usize, rule: &LookupRule) -> Result<Self, DomainError> {
        let source = rule
            .source()
            .map_err(|reason| DomainError::InvalidLookupRule { index, reason })?;
        Ok(Self {
            source,
            dest: rule.dest.clone(),
        })
    }

    /// Canonical address read from the metric, if the source is present and
    /// holds a textual IP address.
    fn address(&self, metric: &Metric) -> Option<String> {
        let raw = match &self.source {
            LookupSource::Field(name) => metric.get_field(name).and_then(FieldValue::as_str),
            LookupSource::Tag(name) => metric.get_tag(name),
        }?;

        raw.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
    }

    fn write(&self, metric: &mut Metric, hostname: String) {
        match &self.source {
            LookupSource::Field(_) => metric.add_field(self.dest.as_str(), hostname),
            LookupSource::Tag(_) => metric.add_tag(self.dest.as_str(), hostname),
        }
    }
}

/// Applies every rule to `metric` in order. Rules whose source is missing
/// or malformed leave the metric as is; an address without a name gets an
/// empty destination.
pub async fn annotate_metric(
    metric: &mut Metric,
    rules: &[CompiledRule],
    lookup: &dyn HostnameLookup,
) {
    for rule in rules {
        let Some(ip) = rule.address(metric) else {
            continue;
        };

        let names = lookup.lookup(&ip).await;
        let hostname = names.into_iter().next().unwrap_or_default();
        if hostname.is_empty() {
            trace!(ip = %ip, dest = %rule.dest, "No hostname for address");
        } else {
            trace!(ip = %ip, hostname = %hostname, dest = %rule.dest, "Annotating metric");
        }
        rule.write(metric, hostname);
    }
}
