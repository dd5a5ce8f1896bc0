use async_trait::async_trait;
use metric_rdns_application::ports::{
    AddressResolver, CacheMaintenancePort, HostnameLookup, MetricSink,
};
use metric_rdns_application::use_cases::ReverseDnsProcessor;
use metric_rdns_domain::{DomainError, FieldValue, LookupRule, Metric, ReverseDnsConfig};
use metric_rdns_infrastructure::dns::{ReverseDnsCache, ReverseDnsCacheMaintenance};
use metric_rdns_infrastructure::system::SystemAddressResolver;
use metric_rdns_jobs::{CacheCleanupJob, JobRunner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

struct TableResolver {
    table: HashMap<&'static str, (&'static str, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl TableResolver {
    fn new(entries: &[(&'static str, &'static str, u64)]) -> Arc<Self> {
        Arc::new(Self {
            table: entries
                .iter()
                .map(|(ip, name, delay_ms)| (*ip, (*name, Duration::from_millis(*delay_ms))))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressResolver for TableResolver {
    async fn lookup_addr(&self, ip: &str) -> Result<Vec<String>, DomainError> {
        self.calls.lock().unwrap().push(ip.to_string());
        match self.table.get(ip) {
            Some((name, delay)) => {
                sleep(*delay).await;
                Ok(vec![name.to_string()])
            }
            None => Err(DomainError::NoHostname(ip.to_string())),
        }
    }
}

/// Never answers.
struct BlackholeResolver;

#[async_trait]
impl AddressResolver for BlackholeResolver {
    async fn lookup_addr(&self, _ip: &str) -> Result<Vec<String>, DomainError> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct CollectingSink {
    metrics: Mutex<Vec<Metric>>,
}

impl CollectingSink {
    fn metrics(&self) -> Vec<Metric> {
        self.metrics.lock().unwrap().clone()
    }
}

impl MetricSink for CollectingSink {
    fn pass_metric(&self, metric: Metric) {
        self.metrics.lock().unwrap().push(metric);
    }
}

fn config(lookups: Vec<LookupRule>) -> ReverseDnsConfig {
    ReverseDnsConfig {
        lookups,
        ..ReverseDnsConfig::default()
    }
}

fn processor_for(
    config: &ReverseDnsConfig,
    resolver: Arc<dyn AddressResolver>,
) -> (ReverseDnsProcessor, ReverseDnsCache, Arc<CollectingSink>) {
    let cache = ReverseDnsCache::from_config(config, resolver);
    let lookup: Arc<dyn HostnameLookup> = Arc::new(cache.clone());
    let mut processor = ReverseDnsProcessor::new(config, lookup).unwrap();
    let sink = Arc::new(CollectingSink::default());
    processor.start(sink.clone());
    (processor, cache, sink)
}

#[tokio::test(start_paused = true)]
async fn test_metrics_are_annotated_and_kept_in_order() {
    let resolver = TableResolver::new(&[
        ("8.8.8.8", "dns.google.", 300),
        ("127.0.0.1", "localhost", 10),
    ]);
    let config = config(vec![
        LookupRule::tag("source_ip", "source_name"),
        LookupRule::field("dest_ip", "dest_name"),
    ]);
    let (mut processor, cache, sink) =
        processor_for(&config, resolver.clone() as Arc<dyn AddressResolver>);

    for seq in 0..6i64 {
        let ip = if seq % 2 == 0 { "8.8.8.8" } else { "127.0.0.1" };
        let metric = Metric::new("flow")
            .with_tag("source_ip", ip)
            .with_field("dest_ip", "127.0.0.1")
            .with_field("seq", seq);
        processor.add(metric).await.unwrap();
    }
    processor.stop().await;

    let metrics = sink.metrics();
    let order: Vec<i64> = metrics
        .iter()
        .filter_map(|m| match m.get_field("seq") {
            Some(FieldValue::Integer(seq)) => Some(*seq),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);

    assert_eq!(metrics[0].get_tag("source_name"), Some("dns.google."));
    assert_eq!(metrics[1].get_tag("source_name"), Some("localhost"));
    for metric in &metrics {
        assert_eq!(
            metric.get_field("dest_name"),
            Some(&FieldValue::String("localhost".to_string()))
        );
    }

    let mut calls = resolver.calls();
    calls.sort();
    assert_eq!(calls, vec!["127.0.0.1", "8.8.8.8"]);

    let stats = cache.stats();
    assert_eq!(stats.cache_miss, 2);
    assert_eq!(stats.size, 2);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_resolver_passes_metrics_through() {
    let mut config = config(vec![LookupRule::tag("ip", "host")]);
    config.lookup_timeout = Duration::from_millis(500);
    let (mut processor, _cache, sink) =
        processor_for(&config, Arc::new(BlackholeResolver) as Arc<dyn AddressResolver>);

    let started = Instant::now();
    for i in 1..=5 {
        let metric = Metric::new("ping").with_tag("ip", format!("192.0.2.{}", i));
        processor.add(metric).await.unwrap();
    }
    processor.stop().await;
    let elapsed = started.elapsed();

    let metrics = sink.metrics();
    assert_eq!(metrics.len(), 5);
    assert!(metrics.iter().all(|m| m.get_tag("host") == Some("")));
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_cleanup_job_expires_cached_answers() {
    let resolver = TableResolver::new(&[("10.0.0.1", "host.example.", 0)]);
    let mut config = config(vec![LookupRule::tag("ip", "host")]);
    config.cache_ttl = Duration::from_secs(2);

    let cache = ReverseDnsCache::from_config(&config, resolver.clone() as Arc<dyn AddressResolver>);
    let maintenance: Arc<dyn CacheMaintenancePort> =
        Arc::new(ReverseDnsCacheMaintenance::new(cache.clone()));
    let shutdown = CancellationToken::new();

    JobRunner::new()
        .with_cache_cleanup(
            CacheCleanupJob::new(maintenance).with_interval(Duration::from_secs(1)),
        )
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    assert_eq!(cache.lookup("10.0.0.1").await, vec!["host.example."]);
    assert!(cache.contains("10.0.0.1"));

    sleep(Duration::from_millis(3500)).await;

    assert!(!cache.contains("10.0.0.1"));
    assert_eq!(cache.stats().cache_expire, 1);

    shutdown.cancel();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_system_resolver_annotates_google_dns() {
    let config = config(vec![LookupRule::tag("server", "server_name")]);
    let (mut processor, _cache, sink) = processor_for(
        &config,
        Arc::new(SystemAddressResolver::new()) as Arc<dyn AddressResolver>,
    );

    processor
        .add(Metric::new("dns").with_tag("server", "8.8.8.8"))
        .await
        .unwrap();
    processor.stop().await;

    let metrics = sink.metrics();
    assert_eq!(metrics[0].get_tag("server_name"), Some("dns.google."));
}
