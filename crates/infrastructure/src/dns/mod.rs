pub mod cache_maintenance;
pub mod reverse_cache;

pub use cache_maintenance::ReverseDnsCacheMaintenance;
pub use reverse_cache::{CacheMetrics, CacheStats, ReverseDnsCache};
