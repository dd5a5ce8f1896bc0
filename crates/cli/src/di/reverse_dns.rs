use metric_rdns_application::ports::{AddressResolver, CacheMaintenancePort, HostnameLookup};
use metric_rdns_application::use_cases::ReverseDnsProcessor;
use metric_rdns_domain::Config;
use metric_rdns_infrastructure::dns::{ReverseDnsCache, ReverseDnsCacheMaintenance};
use metric_rdns_infrastructure::system::SystemAddressResolver;
use metric_rdns_jobs::CacheCleanupJob;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct ReverseDnsServices {
    pub cache: ReverseDnsCache,
    pub processor: ReverseDnsProcessor,
    pub maintenance: Arc<dyn CacheMaintenancePort>,
    cleanup_interval: Duration,
}

impl ReverseDnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let rdns = &config.reverse_dns;

        info!(
            cache_ttl = ?rdns.cache_ttl,
            lookup_timeout = ?rdns.lookup_timeout,
            max_parallel_lookups = rdns.effective_parallel_lookups(),
            ordered = rdns.ordered,
            "Initializing reverse DNS services"
        );

        let resolver: Arc<dyn AddressResolver> = Arc::new(SystemAddressResolver::new());
        let cache = ReverseDnsCache::from_config(rdns, resolver);
        let lookup: Arc<dyn HostnameLookup> = Arc::new(cache.clone());

        let processor = ReverseDnsProcessor::new(rdns, lookup)
            .map_err(|e| anyhow::anyhow!("Invalid reverse DNS configuration: {}", e))?;

        let maintenance: Arc<dyn CacheMaintenancePort> =
            Arc::new(ReverseDnsCacheMaintenance::new(cache.clone()));

        Ok(Self {
            cache,
            processor,
            maintenance,
            cleanup_interval: rdns.cleanup_interval,
        })
    }

    pub fn cleanup_job(&self) -> CacheCleanupJob {
        CacheCleanupJob::new(Arc::clone(&self.maintenance)).with_interval(self.cleanup_interval)
    }
}
