mod address_resolver;
mod cache_maintenance_port;
mod hostname_lookup;
mod metric_sink;

pub use address_resolver::AddressResolver;
pub use cache_maintenance_port::{CacheCleanupOutcome, CacheMaintenancePort};
pub use hostname_lookup::HostnameLookup;
pub use metric_sink::MetricSink;
